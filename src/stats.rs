use crate::models::{Dataset, SelectionState};
use serde::{Deserialize, Serialize};

/// Summary statistics for one time period across all categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodSummary {
    pub period_id: String,
    pub period_label: String,
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Category holding the maximum (first one on ties).
    pub top_category: Option<String>,
}

/// First-to-last movement of one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryChange {
    pub category: String,
    pub first: f64,
    pub last: f64,
    /// `last - first`, in percentage points.
    pub delta_points: f64,
}

/// Compute statistics for every selected period, in period order.
pub fn period_summary(dataset: &Dataset, selection: &SelectionState) -> Vec<PeriodSummary> {
    let mut out = Vec::new();
    for (idx, period) in dataset.periods().iter().enumerate() {
        if !selection.contains(&period.id) {
            continue;
        }
        let column: Vec<(&str, f64)> = dataset
            .categories()
            .iter()
            .map(|c| (c.name.as_str(), c.values[idx]))
            .collect();
        let mut vals: Vec<f64> = column.iter().map(|(_, v)| *v).collect();
        vals.sort_by(|a, b| a.total_cmp(b));
        let count = vals.len();
        let min = vals.first().cloned();
        let max = vals.last().cloned();
        let mean = if count > 0 {
            Some(vals.iter().copied().sum::<f64>() / count as f64)
        } else {
            None
        };
        let median = if count == 0 {
            None
        } else if count % 2 == 1 {
            Some(vals[count / 2])
        } else {
            Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
        };
        let top_category = max.and_then(|m| {
            column
                .iter()
                .find(|(_, v)| *v == m)
                .map(|(name, _)| name.to_string())
        });
        out.push(PeriodSummary {
            period_id: period.id.clone(),
            period_label: period.label.clone(),
            count,
            min,
            max,
            mean,
            median,
            top_category,
        });
    }
    out
}

/// Change between the first and the last period for each category.
pub fn category_change(dataset: &Dataset) -> Vec<CategoryChange> {
    dataset
        .categories()
        .iter()
        .filter_map(|c| {
            let first = *c.values.first()?;
            let last = *c.values.last()?;
            Some(CategoryChange {
                category: c.name.clone(),
                first,
                last,
                delta_points: ((last - first) * 1000.0).round() / 10.0,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_for_one_period() {
        let d = Dataset::london_cost_of_living();
        let sel = SelectionState::from_ids(&d, ["sept22"]);
        let s = period_summary(&d, &sel);
        assert_eq!(s.len(), 1);
        let s = &s[0];
        assert_eq!(s.count, 5);
        assert_eq!(s.min, Some(0.12));
        assert_eq!(s.max, Some(0.50));
        assert_eq!(s.median, Some(0.35));
        assert_eq!(s.top_category.as_deref(), Some("Buying cheaper products"));
    }

    #[test]
    fn empty_selection_has_no_summaries() {
        let d = Dataset::london_cost_of_living();
        assert!(period_summary(&d, &SelectionState::new()).is_empty());
    }

    #[test]
    fn change_in_points() {
        let d = Dataset::london_cost_of_living();
        let c = category_change(&d);
        assert_eq!(c.len(), 5);
        assert_eq!(c[0].delta_points, 23.0);
        assert_eq!(c[4].delta_points, -6.0);
    }
}
