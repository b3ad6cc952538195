//! Visualization: the grouped bar chart and its outputs (**SVG**, **HTML**, **PNG**).
//!
//! [`ChartRenderer`] keeps a retained [`Scene`] in sync with a [`SelectionState`]:
//! each [`update`](ChartRenderer::update) recomputes the scales from the selected
//! periods and reconciles bars, axes and legend. Bar widths animate; call
//! [`advance`](ChartRenderer::advance) from a frame loop or
//! [`settle`](ChartRenderer::settle) before a static export.

pub mod raster;
pub mod scale;
pub mod scene;
pub mod svg;
pub mod text;
pub mod types;
pub mod util;

// Re-export types for public API
pub use scene::{Bar, CategoryGroup, Checkbox, JoinStats, LegendEntry, Scene};
pub use types::{ChartConfig, DEFAULT_PALETTE, Margins, Rgb};

use std::path::Path;
use std::time::Duration;

use anyhow::Result;

use crate::models::{Dataset, RenderModel, SelectionState};
use scale::{BandScale, LinearScale, OrdinalColorScale};
use scene::{Axis, AxisOrient, BarTarget, Tick, Title, join_legend};
use util::{fit_axis_label, format_percent};

/// Output formats picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Html,
    Png,
}

impl OutputFormat {
    /// `svg` and `html`/`htm` by extension (case-insensitive); anything else is PNG.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .as_deref()
        {
            Some("svg") => OutputFormat::Svg,
            Some("html") | Some("htm") => OutputFormat::Html,
            _ => OutputFormat::Png,
        }
    }
}

/// Grouped bar chart bound to one dataset.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    dataset: Dataset,
    config: ChartConfig,
    selection: SelectionState,
    x: LinearScale,
    y0: BandScale,
    y1: BandScale,
    color: OrdinalColorScale,
    scene: Scene,
}

impl ChartRenderer {
    /// Set up checkboxes, title and axes with an empty selection (value domain `[0,0]`).
    pub fn new(dataset: Dataset, config: ChartConfig) -> Self {
        let width = config.inner_width();
        let height = config.inner_height();

        let mut x = LinearScale::new((0.0, width));
        x.set_domain(0.0, 0.0);
        let mut y0 = BandScale::new();
        y0.set_domain(dataset.categories().iter().map(|c| c.name.clone()));
        y0.range_bands(0.0, height, config.category_padding);
        let y1 = BandScale::new();
        let color = OrdinalColorScale::new(config.palette.clone());

        let title = config
            .title
            .clone()
            .unwrap_or_else(|| dataset.title().to_string());

        let scene = Scene {
            outer_width: config.width,
            outer_height: config.height,
            origin: (config.margins.left as f64, config.margins.top as f64),
            inner_width: width,
            inner_height: height,
            label_font_px: config.label_font_px,
            x_axis: Axis::new(AxisOrient::Bottom, (0.0, height), (0.0, width)),
            y_axis: Axis::new(AxisOrient::Left, (0.0, 0.0), (0.0, height)),
            groups: Vec::new(),
            legend: Vec::new(),
            title: Title {
                text: title,
                x: width / 2.0,
                y: -(config.margins.top as f64) / 2.0,
                font_px: config.title_font_px,
            },
            checkboxes: dataset
                .periods()
                .iter()
                .map(|p| Checkbox {
                    id: p.id.clone(),
                    label: p.label.clone(),
                    checked: false,
                })
                .collect(),
        };

        let mut renderer = Self {
            dataset,
            config,
            selection: SelectionState::new(),
            x,
            y0,
            y1,
            color,
            scene,
        };
        renderer.draw_axes();
        renderer
    }

    /// Renderer for the built-in London survey with the default layout.
    pub fn london() -> Self {
        Self::new(Dataset::london_cost_of_living(), ChartConfig::default())
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Current value-scale domain.
    pub fn value_domain(&self) -> (f64, f64) {
        self.x.domain()
    }

    pub fn render_model(&self) -> RenderModel {
        self.dataset.render_model(&self.selection)
    }

    /// A checkbox changed: update the selection and redraw.
    pub fn toggle(&mut self, period_id: &str, checked: bool) {
        if self.dataset.period(period_id).is_none() {
            log::warn!("ignoring toggle of unknown time period `{period_id}`");
            return;
        }
        let mut selection = self.selection.clone();
        selection.set(period_id, checked);
        self.update(&selection);
    }

    /// Recompute scales from `selection` and reconcile the scene.
    /// Ids the dataset doesn't know are dropped, so the legend always has one entry per checked period.
    pub fn update(&mut self, selection: &SelectionState) {
        self.selection = SelectionState::from_ids(&self.dataset, selection.ids());
        let model = self.dataset.render_model(&self.selection);
        let duration = Duration::from_millis(self.config.transition_ms);

        let max = model.max_value().unwrap_or(0.0);
        self.x.set_domain(0.0, max);

        self.y0
            .set_domain(model.categories.iter().map(|c| c.category.clone()));
        self.y0
            .range_bands(0.0, self.config.inner_height(), self.config.category_padding);
        self.y1
            .set_domain(model.periods.iter().map(|p| p.id.clone()));
        self.y1
            .range_round_bands(0.0, self.y0.bandwidth(), self.config.period_padding);

        self.draw_axes();

        let mut stats = JoinStats::default();
        for (i, cat) in model.categories.iter().enumerate() {
            let offset = self.y0.apply(&cat.category).unwrap_or(0.0);
            if i == self.scene.groups.len() {
                self.scene
                    .groups
                    .push(CategoryGroup::new(cat.category.clone(), offset));
            }
            let targets: Vec<BarTarget> = cat
                .bars
                .iter()
                .map(|b| BarTarget {
                    id: b.period_id.clone(),
                    label: b.period_label.clone(),
                    y: self.y1.apply(&b.period_id).unwrap_or(0.0),
                    height: self.y1.bandwidth(),
                    fill: self.color.color(&b.period_label),
                    width: self.x.apply(b.value),
                })
                .collect();
            let group = &mut self.scene.groups[i];
            group.name = cat.category.clone();
            group.offset = offset;
            stats += group.join_bars(targets, duration);
        }
        self.scene.groups.truncate(model.categories.len());

        let legend_targets: Vec<LegendEntry> = model
            .periods
            .iter()
            .enumerate()
            .map(|(i, p)| LegendEntry {
                label: p.label.clone(),
                color: self.color.color(&p.label),
                offset_y: self.config.legend_top + i as f64 * self.config.legend_row_height,
            })
            .collect();
        let legend_stats = join_legend(&mut self.scene.legend, legend_targets);

        for cb in &mut self.scene.checkboxes {
            cb.checked = self.selection.contains(&cb.id);
        }

        log::debug!(
            "update: {} period(s) selected, value domain [0, {max}], bars {:?}, legend {:?}",
            self.selection.len(),
            stats,
            legend_stats
        );
    }

    fn draw_axes(&mut self) {
        let (x_ticks, y_ticks) = (
            self.x
                .ticks(self.config.value_ticks)
                .into_iter()
                .map(|t| Tick {
                    offset: self.x.apply(t),
                    label: format_percent(t),
                })
                .collect(),
            self.y0
                .domain()
                .iter()
                .filter_map(|name| {
                    let y = self.y0.apply(name)?;
                    Some(Tick {
                        offset: y + self.y0.bandwidth() / 2.0,
                        label: fit_axis_label(
                            name,
                            self.config.label_font_px,
                            self.config.margins.left as f64,
                        ),
                    })
                })
                .collect(),
        );
        self.scene.x_axis.ticks = x_ticks;
        self.scene.y_axis.ticks = y_ticks;
    }

    /// Step running transitions by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.scene.advance(dt);
    }

    /// Jump every transition to its end state.
    pub fn settle(&mut self) {
        self.scene.settle();
    }

    pub fn is_animating(&self) -> bool {
        self.scene.is_animating()
    }

    pub fn to_svg(&self) -> String {
        svg::scene_to_svg(&self.scene)
    }

    pub fn to_html(&self) -> String {
        svg::scene_to_html(&self.scene)
    }

    /// Write the current scene; format from the extension (`svg`, `html`, otherwise PNG).
    pub fn save<P: AsRef<Path>>(&self, out_path: P) -> Result<()> {
        let out_path = out_path.as_ref();
        match OutputFormat::from_path(out_path) {
            OutputFormat::Svg => std::fs::write(out_path, self.to_svg())?,
            OutputFormat::Html => std::fs::write(out_path, self.to_html())?,
            OutputFormat::Png => raster::save_png(&self.scene, out_path)?,
        }
        log::info!("wrote chart to {}", out_path.display());
        Ok(())
    }
}

/// Convenience: render the dataset with the given periods selected, settled, to `out_path`.
pub fn render_chart<P: AsRef<Path>>(
    dataset: &Dataset,
    selection: &SelectionState,
    config: &ChartConfig,
    out_path: P,
) -> Result<()> {
    let mut renderer = ChartRenderer::new(dataset.clone(), config.clone());
    renderer.update(selection);
    renderer.settle();
    renderer.save(out_path)
}
