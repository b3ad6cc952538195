use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// One labelled survey date, e.g. `jan22` / "Jan 2022".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimePeriod {
    pub id: String,
    pub label: String,
}

impl TimePeriod {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// A survey category with one share (0..=1) per time period, in period order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub name: String,
    pub values: Vec<f64>,
}

/// Validation failures when building a [`Dataset`].
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("dataset has no time periods")]
    NoPeriods,
    #[error("duplicate time period id `{0}`")]
    DuplicatePeriod(String),
    #[error("duplicate category `{0}`")]
    DuplicateCategory(String),
    #[error("category `{category}` has {found} values, expected {expected}")]
    ValueCount {
        category: String,
        expected: usize,
        found: usize,
    },
    #[error("category `{category}` has value {value} for `{period}` outside 0..=1")]
    ValueOutOfRange {
        category: String,
        period: String,
        value: f64,
    },
    #[error("category `{category}` has no value for `{period}`")]
    MissingValue { category: String, period: String },
}

/// Immutable chart data: the period list and the categories measured over it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataset")]
pub struct Dataset {
    title: String,
    periods: Vec<TimePeriod>,
    categories: Vec<CategoryRecord>,
}

#[derive(Deserialize)]
struct RawDataset {
    #[serde(default)]
    title: String,
    periods: Vec<TimePeriod>,
    categories: Vec<CategoryRecord>,
}

impl TryFrom<RawDataset> for Dataset {
    type Error = DataError;

    fn try_from(raw: RawDataset) -> Result<Self, Self::Error> {
        Dataset::new(raw.title, raw.periods, raw.categories)
    }
}

pub const LONDON_TITLE: &str = "Several ways Londoners tackle the cost-of-living crisis";

impl Dataset {
    /// Validate and build a dataset.
    pub fn new(
        title: impl Into<String>,
        periods: Vec<TimePeriod>,
        categories: Vec<CategoryRecord>,
    ) -> Result<Self, DataError> {
        if periods.is_empty() {
            return Err(DataError::NoPeriods);
        }
        let mut seen = BTreeSet::new();
        for p in &periods {
            if !seen.insert(p.id.as_str()) {
                return Err(DataError::DuplicatePeriod(p.id.clone()));
            }
        }
        let mut names = BTreeSet::new();
        for c in &categories {
            if !names.insert(c.name.as_str()) {
                return Err(DataError::DuplicateCategory(c.name.clone()));
            }
            if c.values.len() != periods.len() {
                return Err(DataError::ValueCount {
                    category: c.name.clone(),
                    expected: periods.len(),
                    found: c.values.len(),
                });
            }
            for (p, v) in periods.iter().zip(&c.values) {
                if !v.is_finite() || !(0.0..=1.0).contains(v) {
                    return Err(DataError::ValueOutOfRange {
                        category: c.name.clone(),
                        period: p.id.clone(),
                        value: *v,
                    });
                }
            }
        }
        Ok(Self {
            title: title.into(),
            periods,
            categories,
        })
    }

    /// The London cost-of-living survey shipped with the chart.
    pub fn london_cost_of_living() -> Self {
        let periods = vec![
            TimePeriod::new("jan22", "Jan 2022"),
            TimePeriod::new("may22", "May 2022"),
            TimePeriod::new("sept22", "Sept 2022"),
            TimePeriod::new("jan23", "Jan 2023"),
        ];
        let rows: [(&str, [f64; 4]); 5] = [
            ("Using less water, energy or fuel", [0.22, 0.37, 0.44, 0.45]),
            ("Buying cheaper products", [0.36, 0.43, 0.50, 0.49]),
            ("Using free transport", [0.26, 0.27, 0.26, 0.21]),
            ("Buying less food and essentials", [0.21, 0.26, 0.35, 0.31]),
            ("Looking for a better-paying job", [0.16, 0.12, 0.12, 0.10]),
        ];
        let categories = rows
            .iter()
            .map(|(name, values)| CategoryRecord {
                name: name.to_string(),
                values: values.to_vec(),
            })
            .collect();
        Self {
            title: LONDON_TITLE.to_string(),
            periods,
            categories,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn periods(&self) -> &[TimePeriod] {
        &self.periods
    }

    pub fn categories(&self) -> &[CategoryRecord] {
        &self.categories
    }

    pub fn period(&self, id: &str) -> Option<&TimePeriod> {
        self.periods.iter().find(|p| p.id == id)
    }

    /// Build the per-category view of the selected periods (period order, not selection order).
    pub fn render_model(&self, selection: &SelectionState) -> RenderModel {
        let visible: Vec<(usize, &TimePeriod)> = self
            .periods
            .iter()
            .enumerate()
            .filter(|(_, p)| selection.contains(&p.id))
            .collect();
        let categories = self
            .categories
            .iter()
            .map(|c| CategoryBars {
                category: c.name.clone(),
                bars: visible
                    .iter()
                    .map(|(i, p)| BarDatum {
                        period_id: p.id.clone(),
                        period_label: p.label.clone(),
                        value: c.values[*i],
                    })
                    .collect(),
            })
            .collect();
        RenderModel {
            periods: visible.into_iter().map(|(_, p)| p.clone()).collect(),
            categories,
        }
    }
}

/// The set of checked period ids. Order is irrelevant: rendering walks the dataset's period order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    ids: BTreeSet<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every period of the dataset.
    pub fn all(dataset: &Dataset) -> Self {
        Self {
            ids: dataset.periods().iter().map(|p| p.id.clone()).collect(),
        }
    }

    /// Keep only ids the dataset knows about; unknown ids are dropped with a warning.
    pub fn from_ids<I, S>(dataset: &Dataset, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Self::new();
        for id in ids {
            let id = id.as_ref().trim();
            if id.is_empty() {
                continue;
            }
            if dataset.period(id).is_some() {
                out.ids.insert(id.to_string());
            } else {
                log::warn!("ignoring unknown time period `{id}`");
            }
        }
        out
    }

    pub fn set(&mut self, id: &str, checked: bool) {
        if checked {
            self.ids.insert(id.to_string());
        } else {
            self.ids.remove(id);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Checked ids in lexical order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

/// One visible (category, period) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct BarDatum {
    pub period_id: String,
    pub period_label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBars {
    pub category: String,
    pub bars: Vec<BarDatum>,
}

/// Derived from (dataset, selection) on every update.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderModel {
    pub periods: Vec<TimePeriod>,
    pub categories: Vec<CategoryBars>,
}

impl RenderModel {
    /// Largest visible value, `None` when nothing is selected.
    pub fn max_value(&self) -> Option<f64> {
        self.categories
            .iter()
            .flat_map(|c| c.bars.iter().map(|b| b.value))
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
    }

    pub fn bar_count(&self) -> usize {
        self.categories.iter().map(|c| c.bars.len()).sum()
    }
}
