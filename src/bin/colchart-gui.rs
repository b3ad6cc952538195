/*!
 * GUI application for col-chart - interactive cost-of-living survey chart
 *
 * A cross-platform desktop application providing:
 * - One checkbox per survey date, toggling that series on and off
 * - A live grouped bar chart with animated bar transitions
 * - Export of the current chart as SVG, HTML or PNG
 *
 * Platform support: Windows, macOS, Linux
 */

use clap::Parser;
use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};
use std::path::PathBuf;
use std::time::Duration;
use col_chart::viz::scene::{Axis, AxisOrient, Scene};
use col_chart::viz::{Rgb, raster};
use col_chart::{ChartConfig, ChartRenderer, Dataset, storage};

#[derive(Parser, Debug)]
#[command(
    name = "colchart-gui",
    version,
    about = "Interactive cost-of-living survey chart"
)]
struct GuiArgs {
    /// CSV or JSON dataset to show instead of the built-in survey.
    data: Option<PathBuf>,
    /// JSON layout config (any subset of the fields; the rest use defaults).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Font file used for text in PNG exports.
    #[arg(long)]
    font: Option<PathBuf>,
}

fn main() -> Result<(), eframe::Error> {
    // Enable logging for better debugging
    env_logger::init();

    let app = match ColChartApp::from_args(&GuiArgs::parse()) {
        Ok(app) => app,
        Err(err) => {
            log::error!("{err:#}");
            ColChartApp::new(Dataset::london_cost_of_living(), ChartConfig::default())
        }
    };
    let size = [
        app.chart.config().width as f32 + 40.0,
        app.chart.config().height as f32 + 160.0,
    ];

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(size)
            .with_min_inner_size([600.0, 400.0])
            .with_title("Londoners and the cost-of-living crisis"),
        ..Default::default()
    };

    eframe::run_native(
        "col-chart",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}

/// Main application state
struct ColChartApp {
    chart: ChartRenderer,

    // Export options
    output_dir: PathBuf,

    // UI state
    status_message: String,
    error_message: String,
}

impl ColChartApp {
    fn new(dataset: Dataset, config: ChartConfig) -> Self {
        // Default to user's home directory for output
        let output_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            chart: ChartRenderer::new(dataset, config),
            output_dir,
            status_message: String::new(),
            error_message: String::new(),
        }
    }

    fn from_args(args: &GuiArgs) -> anyhow::Result<Self> {
        let dataset = match &args.data {
            Some(path) => storage::load(path)?,
            None => Dataset::london_cost_of_living(),
        };
        let config = match &args.config {
            Some(path) => ChartConfig::from_json_file(path)?,
            None => ChartConfig::default(),
        };
        if let Some(font) = &args.font {
            raster::register_font_file(font)?;
        }
        Ok(Self::new(dataset, config))
    }

    fn export(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_directory(&self.output_dir)
            .set_file_name("londoners.svg")
            .add_filter("SVG", &["svg"])
            .add_filter("HTML", &["html"])
            .add_filter("PNG", &["png"])
            .save_file();
        let Some(path) = picked else {
            return;
        };
        if let Some(dir) = path.parent() {
            self.output_dir = dir.to_path_buf();
        }

        // export the end state, not a frame of a running animation
        let mut snapshot = self.chart.clone();
        snapshot.settle();
        match snapshot.save(&path) {
            Ok(()) => {
                self.status_message = format!("Saved chart to {}", path.display());
                self.error_message.clear();
            }
            Err(err) => {
                self.error_message = format!("Failed to save chart: {}", err);
                self.status_message.clear();
            }
        }
    }
}

impl eframe::App for ColChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let dt = ctx.input(|i| i.stable_dt);
        self.chart.advance(Duration::from_secs_f32(dt.max(0.0)));

        egui::CentralPanel::default().show(ctx, |ui| {
            // The `.categories` container
            ui.horizontal_wrapped(|ui| {
                let boxes = self.chart.scene().checkboxes.clone();
                for cb in boxes {
                    let mut checked = cb.checked;
                    if ui.checkbox(&mut checked, cb.label.as_str()).changed() {
                        self.chart.toggle(&cb.id, checked);
                    }
                }
            });

            ui.add_space(8.0);

            // The `.graph` container
            let scene = self.chart.scene();
            let size = Vec2::new(scene.outer_width as f32, scene.outer_height as f32);
            let (response, painter) = ui.allocate_painter(size, Sense::hover());
            painter.rect_filled(response.rect, 0.0, Color32::WHITE);
            paint_scene(&painter, response.rect.min, scene);

            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if ui.button("Export…").clicked() {
                    self.export();
                }
                ui.label(format!("Output folder: {}", self.output_dir.display()));
            });

            // Status messages
            if !self.status_message.is_empty() {
                ui.colored_label(Color32::DARK_GREEN, &self.status_message);
            }

            if !self.error_message.is_empty() {
                ui.colored_label(Color32::RED, &self.error_message);
            }
        });

        if self.chart.is_animating() {
            ctx.request_repaint();
        }
    }
}

fn color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c.0, c.1, c.2)
}

fn paint_scene(painter: &egui::Painter, canvas_min: Pos2, scene: &Scene) {
    let origin = canvas_min + Vec2::new(scene.origin.0 as f32, scene.origin.1 as f32);
    let at = |x: f64, y: f64| origin + Vec2::new(x as f32, y as f32);
    let font = FontId::proportional(scene.label_font_px as f32);

    for (group, bar) in scene.bars() {
        let top = group.offset + bar.y;
        let rect = Rect::from_min_max(at(bar.x, top), at(bar.x + bar.width(), top + bar.height));
        painter.rect_filled(rect, 0.0, color32(bar.fill));
    }

    paint_axis(painter, at(scene.x_axis.origin.0, scene.x_axis.origin.1), &scene.x_axis, &font);
    paint_axis(painter, at(scene.y_axis.origin.0, scene.y_axis.origin.1), &scene.y_axis, &font);

    for entry in &scene.legend {
        let x0 = scene.inner_width - 18.0;
        let swatch = Rect::from_min_size(at(x0, entry.offset_y), Vec2::splat(18.0));
        painter.rect_filled(swatch, 0.0, color32(entry.color));
        painter.text(
            at(scene.inner_width - 24.0, entry.offset_y + 9.0),
            Align2::RIGHT_CENTER,
            &entry.label,
            font.clone(),
            Color32::BLACK,
        );
    }

    let t = &scene.title;
    painter.text(
        at(t.x, t.y),
        Align2::CENTER_CENTER,
        &t.text,
        FontId::proportional(t.font_px as f32),
        Color32::BLACK,
    );
}

fn paint_axis(painter: &egui::Painter, origin: Pos2, axis: &Axis, font: &FontId) {
    let stroke = Stroke::new(1.0, Color32::BLACK);
    let size = Axis::TICK_SIZE as f32;
    let gap = (Axis::TICK_SIZE + Axis::TICK_PADDING) as f32;
    let (e0, e1) = (axis.extent.0 as f32, axis.extent.1 as f32);
    match axis.orient {
        AxisOrient::Bottom => {
            painter.line_segment([origin + Vec2::new(e0, 0.0), origin + Vec2::new(e1, 0.0)], stroke);
            for tick in &axis.ticks {
                let x = tick.offset as f32;
                painter.line_segment([origin + Vec2::new(x, 0.0), origin + Vec2::new(x, size)], stroke);
                painter.text(
                    origin + Vec2::new(x, gap),
                    Align2::CENTER_TOP,
                    &tick.label,
                    font.clone(),
                    Color32::BLACK,
                );
            }
        }
        AxisOrient::Left => {
            painter.line_segment([origin + Vec2::new(0.0, e0), origin + Vec2::new(0.0, e1)], stroke);
            for tick in &axis.ticks {
                let y = tick.offset as f32;
                painter.line_segment([origin + Vec2::new(0.0, y), origin + Vec2::new(-size, y)], stroke);
                painter.text(
                    origin + Vec2::new(-gap, y),
                    Align2::RIGHT_CENTER,
                    &tick.label,
                    font.clone(),
                    Color32::BLACK,
                );
            }
        }
    }
}
