//! Utility functions for visualization: tick formatting, number output, label fitting.

use super::text::{estimate_text_width_px, truncate_to_width};

/// Whole-percent tick label: `0.05` → `"5%"`. Halves round away from zero.
pub fn format_percent(v: f64) -> String {
    let pct = (v * 100.0).round();
    // avoid "-0%"
    let pct = if pct == 0.0 { 0.0 } else { pct };
    format!("{}%", pct as i64)
}

/// Compact coordinate output for markup: at most three decimals, no trailing zeros.
pub fn fmt_num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// Fit a category label into the left label gutter (`gutter_px` wide, minus tick and padding).
pub fn fit_axis_label(label: &str, font_px: u32, gutter_px: f64) -> String {
    let room = (gutter_px - 9.0).max(0.0) as u32;
    if estimate_text_width_px(label, font_px) <= room {
        label.to_string()
    } else {
        log::debug!("truncating axis label `{label}` to {room}px");
        truncate_to_width(label, font_px, room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_ticks() {
        assert_eq!(format_percent(0.0), "0%");
        assert_eq!(format_percent(0.05), "5%");
        assert_eq!(format_percent(0.45), "45%");
        assert_eq!(format_percent(0.125), "13%");
        assert_eq!(format_percent(-0.001), "0%");
    }

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(fmt_num(560.0), "560");
        assert_eq!(fmt_num(6.470588235), "6.471");
        assert_eq!(fmt_num(0.5), "0.5");
        assert_eq!(fmt_num(-0.0001), "0");
    }

    #[test]
    fn long_labels_are_truncated() {
        let fitted = fit_axis_label("Using less water, energy or fuel", 10, 220.0);
        assert_eq!(fitted, "Using less water, energy or fuel");
        let short = fit_axis_label("Using less water, energy or fuel", 10, 80.0);
        assert!(short.ends_with('…'));
        assert!(short.chars().count() < 32);
    }
}
