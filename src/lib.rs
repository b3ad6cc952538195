//! col_chart
//!
//! A small Rust library rendering a grouped bar chart of how Londoners tackle the
//! cost-of-living crisis, with per-period series that can be switched on and off.
//! Pairs with the `colchart` CLI and the `colchart-gui` desktop app.
//!
//! ### Features
//! - Built-in survey data (five responses, four survey dates) or your own CSV/JSON
//! - Checkbox-style period selection driving scale, bar, axis and legend updates
//! - Animated bar transitions for interactive front ends
//! - SVG, HTML (with the checkbox panel) and PNG output
//! - Per-period summary statistics
//!
//! ### Example
//! ```no_run
//! use col_chart::{ChartRenderer, SelectionState};
//!
//! let mut chart = ChartRenderer::london();
//! let selection = SelectionState::from_ids(chart.dataset(), ["jan22", "jan23"]);
//! chart.update(&selection);
//! chart.settle();
//! chart.save("londoners.svg")?;
//! let stats = col_chart::stats::period_summary(chart.dataset(), &selection);
//! println!("{:#?}", stats);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod models;
pub mod stats;
pub mod storage;
pub mod viz;

pub use models::{CategoryRecord, DataError, Dataset, RenderModel, SelectionState, TimePeriod};
pub use viz::{ChartConfig, ChartRenderer};
