//! Public types and constants for the visualization module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 8-bit RGB colour, (de)serialized as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Option<Rgb> {
        let h = s.trim().trim_start_matches('#');
        if h.len() != 6 || !h.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&h[0..2], 16).ok()?;
        let g = u8::from_str_radix(&h[2..4], 16).ok()?;
        let b = u8::from_str_radix(&h[4..6], 16).ok()?;
        Some(Rgb(r, g, b))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&s).ok_or_else(|| format!("invalid colour `{s}`, expected #RRGGBB"))
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> String {
        c.to_hex()
    }
}

/// Series palette: navy, yellow, lilac, pale blue.
pub const DEFAULT_PALETTE: [Rgb; 4] = [
    Rgb(0x00, 0x11, 0x81),
    Rgb(0xFF, 0xC9, 0x00),
    Rgb(0xD2, 0x87, 0xFF),
    Rgb(0xDB, 0xE4, 0xFF),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for Margins {
    fn default() -> Self {
        // the left side holds the category names
        Self {
            top: 40,
            right: 20,
            bottom: 30,
            left: 220,
        }
    }
}

/// Layout and styling knobs. `Default` reproduces the survey page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Outer width of the SVG in pixels.
    pub width: u32,
    /// Outer height of the SVG in pixels.
    pub height: u32,
    pub margins: Margins,
    pub palette: Vec<Rgb>,
    /// Gap between category bands, as a fraction of the band step.
    pub category_padding: f64,
    /// Gap between bars inside a category band.
    pub period_padding: f64,
    /// Number of ticks requested on the value axis.
    pub value_ticks: usize,
    pub transition_ms: u64,
    /// Vertical offset of the first legend row inside the plot area.
    pub legend_top: f64,
    pub legend_row_height: f64,
    /// Replaces the dataset title when set.
    pub title: Option<String>,
    pub title_font_px: u32,
    pub label_font_px: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            margins: Margins::default(),
            palette: DEFAULT_PALETTE.to_vec(),
            category_padding: 0.1,
            period_padding: 0.0,
            value_ticks: 10,
            transition_ms: 250,
            legend_top: 200.0,
            legend_row_height: 20.0,
            title: None,
            title_font_px: 16,
            label_font_px: 10,
        }
    }
}

impl ChartConfig {
    /// Width of the plotting area inside the margins.
    pub fn inner_width(&self) -> f64 {
        self.width
            .saturating_sub(self.margins.left + self.margins.right) as f64
    }

    /// Height of the plotting area inside the margins.
    pub fn inner_height(&self) -> f64 {
        self.height
            .saturating_sub(self.margins.top + self.margins.bottom) as f64
    }

    /// Read a JSON config; missing fields take their defaults.
    pub fn from_json_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let cfg: ChartConfig = serde_json::from_str(&text)?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip_and_rejects() {
        assert_eq!(Rgb::from_hex("#001181"), Some(Rgb(0, 0x11, 0x81)));
        assert_eq!(Rgb::from_hex("ffc900"), Some(Rgb(255, 201, 0)));
        assert_eq!(Rgb(0xD2, 0x87, 0xFF).to_hex(), "#D287FF");
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#GG0000"), None);
    }

    #[test]
    fn default_inner_area() {
        let cfg = ChartConfig::default();
        assert_eq!(cfg.inner_width(), 560.0);
        assert_eq!(cfg.inner_height(), 330.0);
    }

    #[test]
    fn partial_json_config() {
        let cfg: ChartConfig =
            serde_json::from_str(r##"{"width": 1000, "palette": ["#000000"]}"##).unwrap();
        assert_eq!(cfg.width, 1000);
        assert_eq!(cfg.height, 400);
        assert_eq!(cfg.palette, vec![Rgb::BLACK]);
        assert_eq!(cfg.margins.left, 220);
    }
}
