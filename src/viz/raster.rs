//! PNG output through plotters' bitmap backend.
//!
//! Text needs a font registered with the `ab_glyph` path (it doesn't discover OS fonts).
//! Without one the PNG still gets bars, axes and swatches, but no labels.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_bitmap::BitMapBackend;

use super::scene::{Axis, AxisOrient, Scene};
use super::types::Rgb;

/// Canonical path of the font currently registered as "sans-serif".
static REGISTERED_FONT: Mutex<Option<PathBuf>> = Mutex::new(None);

fn is_current_font(current: Option<&Path>, candidate: &Path) -> bool {
    current == Some(candidate)
}

/// Register a TrueType/OpenType file as the "sans-serif" family for raster text.
///
/// plotters keeps a `'static` reference to the font data, so each newly registered
/// file stays in memory for the rest of the process. Registering the file that is
/// already active is a no-op.
pub fn register_font_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let key = std::fs::canonicalize(path)?;
    let mut current = REGISTERED_FONT
        .lock()
        .map_err(|_| anyhow!("font registry lock poisoned"))?;
    if is_current_font(current.as_deref(), &key) {
        log::debug!("raster font {} already registered", path.display());
        return Ok(());
    }
    let bytes = std::fs::read(&key)?;
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    plotters::style::register_font("sans-serif", plotters::style::FontStyle::Normal, bytes)
        .map_err(|_| anyhow!("{} is not a usable font file", path.display()))?;
    *current = Some(key);
    log::debug!("registered raster font {}", path.display());
    Ok(())
}

pub fn font_registered() -> bool {
    REGISTERED_FONT
        .lock()
        .map(|current| current.is_some())
        .unwrap_or(false)
}

fn color(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

/// Rasterize the scene to a PNG (or any format the `image` crate infers from the path).
pub fn save_png<P: AsRef<Path>>(scene: &Scene, out_path: P) -> Result<()> {
    let path_string = out_path.as_ref().to_string_lossy().into_owned();
    let root = BitMapBackend::new(path_string.as_str(), (scene.outer_width, scene.outer_height))
        .into_drawing_area();
    draw_scene(&root, scene)?;
    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// Helper that draws to any Plotters backend.
pub fn draw_scene<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, scene: &Scene) -> Result<()> {
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let with_text = font_registered();
    if !with_text {
        log::warn!("no raster font registered; PNG output will have no text");
    }
    let (ox, oy) = scene.origin;
    let px = |x: f64, y: f64| ((ox + x).round() as i32, (oy + y).round() as i32);

    for group in &scene.groups {
        for bar in group.bars() {
            let w = bar.width();
            if w <= 0.0 {
                continue;
            }
            let top = group.offset + bar.y;
            root.draw(&Rectangle::new(
                [px(bar.x, top), px(bar.x + w, top + bar.height)],
                color(bar.fill).filled(),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
        }
    }

    draw_axis(root, &scene.x_axis, scene, with_text)?;
    draw_axis(root, &scene.y_axis, scene, with_text)?;

    for entry in &scene.legend {
        let x0 = scene.inner_width - 18.0;
        root.draw(&Rectangle::new(
            [px(x0, entry.offset_y), px(x0 + 18.0, entry.offset_y + 18.0)],
            color(entry.color).filled(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        if with_text {
            let style = TextStyle::from((FontFamily::SansSerif, scene.label_font_px))
                .pos(Pos::new(HPos::Right, VPos::Center));
            root.draw(&Text::new(
                entry.label.clone(),
                px(scene.inner_width - 24.0, entry.offset_y + 9.0),
                style,
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
        }
    }

    if with_text && !scene.title.text.is_empty() {
        let t = &scene.title;
        let style = TextStyle::from((FontFamily::SansSerif, t.font_px))
            .pos(Pos::new(HPos::Center, VPos::Center));
        root.draw(&Text::new(t.text.clone(), px(t.x, t.y), style))
            .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

fn draw_axis<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    axis: &Axis,
    scene: &Scene,
    with_text: bool,
) -> Result<()> {
    let (ox, oy) = (scene.origin.0 + axis.origin.0, scene.origin.1 + axis.origin.1);
    let px = |x: f64, y: f64| ((ox + x).round() as i32, (oy + y).round() as i32);
    let size = Axis::TICK_SIZE;
    let gap = size + Axis::TICK_PADDING;
    let (e0, e1) = axis.extent;

    let domain = match axis.orient {
        AxisOrient::Bottom => vec![px(e0, size), px(e0, 0.0), px(e1, 0.0), px(e1, size)],
        AxisOrient::Left => vec![px(-size, e0), px(0.0, e0), px(0.0, e1), px(-size, e1)],
    };
    root.draw(&PathElement::new(domain, BLACK))
        .map_err(|e| anyhow!("{:?}", e))?;

    for tick in &axis.ticks {
        let (line, anchor, at) = match axis.orient {
            AxisOrient::Bottom => (
                vec![px(tick.offset, 0.0), px(tick.offset, size)],
                Pos::new(HPos::Center, VPos::Top),
                px(tick.offset, gap),
            ),
            AxisOrient::Left => (
                vec![px(0.0, tick.offset), px(-size, tick.offset)],
                Pos::new(HPos::Right, VPos::Center),
                px(-gap, tick.offset),
            ),
        };
        root.draw(&PathElement::new(line, BLACK))
            .map_err(|e| anyhow!("{:?}", e))?;
        if with_text {
            let style = TextStyle::from((FontFamily::SansSerif, scene.label_font_px)).pos(anchor);
            root.draw(&Text::new(tick.label.clone(), at, style))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_font_file_is_not_reloaded() {
        let a = Path::new("/fonts/DejaVuSans.ttf");
        let b = Path::new("/fonts/Inter.ttf");
        assert!(!is_current_font(None, a));
        assert!(is_current_font(Some(a), a));
        assert!(!is_current_font(Some(a), b));
    }

    #[test]
    fn missing_font_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = register_font_file(dir.path().join("nope.ttf"));
        assert!(err.is_err());
    }

    #[test]
    fn non_font_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        let err = register_font_file(&path).unwrap_err();
        assert!(err.to_string().contains("not a usable font file"));
    }
}
