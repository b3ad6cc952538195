//! Text measurement for SVG output, where no font metrics are available.

/// Average glyph advance as a fraction of the font size: 3/5 em.
const ADVANCE_NUM: u32 = 3;
const ADVANCE_DEN: u32 = 5;

/// Estimated pixel width of `text` at `font_px`, rounded up.
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    let chars = text.chars().count() as u32;
    (chars * font_px * ADVANCE_NUM).div_ceil(ADVANCE_DEN)
}

/// How many characters fit into `max_px` at `font_px`.
fn chars_that_fit(font_px: u32, max_px: u32) -> usize {
    let per_char = (font_px * ADVANCE_NUM).max(1);
    (max_px * ADVANCE_DEN / per_char) as usize
}

/// Cut `text` so it fits `max_px`, ending in a single `…` when shortened.
pub fn truncate_to_width(text: &str, font_px: u32, max_px: u32) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    match chars_that_fit(font_px, max_px) {
        0 => String::new(),
        n => text.chars().take(n - 1).chain(std::iter::once('…')).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_is_three_fifths_em_per_char() {
        assert_eq!(estimate_text_width_px("", 10), 0);
        assert_eq!(estimate_text_width_px("abcde", 10), 30);
        assert_eq!(estimate_text_width_px("Jan 2022", 10), 48);
        // 3 chars at 11px is 19.8px
        assert_eq!(estimate_text_width_px("abc", 11), 20);
        assert_eq!(estimate_text_width_px("ééé", 10), 18);
    }

    #[test]
    fn short_text_is_kept() {
        assert_eq!(truncate_to_width("Jan 2022", 10, 100), "Jan 2022");
        assert_eq!(truncate_to_width("Jan 2022", 10, 48), "Jan 2022");
    }

    #[test]
    fn long_text_ends_in_ellipsis_and_fits() {
        let t = truncate_to_width("Buying cheaper products", 10, 60);
        assert_eq!(t, "Buying ch…");
        assert!(estimate_text_width_px(&t, 10) <= 60);
        assert_eq!(truncate_to_width("Buying", 10, 5), "");
    }
}
