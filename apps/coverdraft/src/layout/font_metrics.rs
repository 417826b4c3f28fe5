//! Static font-metric tables used to lay out exported letters.
//!
//! Character widths are in em units (relative to font size). The tables are an
//! approximation of real glyph metrics; they are close enough to decide where a
//! line wraps on a letter page.
//! All tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

use std::str::FromStr;

use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Font family enum
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// Clean humanist sans-serif.
    Inter,
    /// Traditional TeX serif.
    ComputerModern,
}

#[derive(Debug, Error)]
#[error("unknown font family '{0}' (expected 'inter' or 'computer_modern')")]
pub struct UnknownFontFamily(String);

impl FromStr for FontFamily {
    type Err = UnknownFontFamily;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "inter" => Ok(FontFamily::Inter),
            "computer_modern" | "cm" => Ok(FontFamily::ComputerModern),
            _ => Err(UnknownFontFamily(s.to_string())),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

/// Layout parameters for one letter page.
///
/// `text_width_em` is the usable text width in em units at the given font size.
/// Example: US letter paper, 1" margins, 11pt → 6.5" × (72.27pt/in ÷ 11pt) ≈ 42.7em.
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub font: FontFamily,
    pub font_size_pt: u8,
    pub text_width_em: f32,
    /// Text lines that fit between the top and bottom margins.
    pub usable_height_lines: u16,
}

/// Returns the default page config for the given font family.
///
/// Assumes: US letter (8.5" × 11"), 11pt font, 1.0" margins all sides.
pub fn default_page_config(font: FontFamily) -> PageConfig {
    PageConfig {
        font,
        font_size_pt: 11,
        text_width_em: 42.7,
        usable_height_lines: 45,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for a font family.
///
/// `widths[i]` = width of ASCII character `(i + 32)`, covering 0x20 (space) through 0x7E (~).
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for non-ASCII characters (codepoints > 0x7E).
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    ///
    /// Non-ASCII characters fall back to `average_char_width`.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }

    /// Greedy word-wrap of a single paragraph at `config.text_width_em`.
    ///
    /// Interior whitespace collapses to one space. A word wider than the line
    /// gets a line of its own rather than being split. A blank paragraph
    /// yields no lines.
    pub fn wrap(&self, paragraph: &str, config: &PageConfig) -> Vec<String> {
        let max_width = config.text_width_em;
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in paragraph.split_whitespace() {
            let word_w = self.measure_str(word);

            if current.is_empty() {
                current.push_str(word);
                current_width = word_w;
            } else if current_width + self.space_width + word_w > max_width {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_width = word_w;
            } else {
                current.push(' ');
                current.push_str(word);
                current_width += self.space_width + word_w;
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static INTER_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.25, 0.30, 0.38, 0.56, 0.56, 0.89, 0.67, 0.22, 0.33, 0.33, 0.39, 0.59, 0.28, 0.33, 0.28, 0.31,
        // 0     1     2     3     4     5     6     7     8     9
        0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
        // :     ;     <     =     >     ?     @
        0.28, 0.28, 0.59, 0.59, 0.59, 0.50, 1.02,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.67, 0.61, 0.61, 0.67, 0.56, 0.50, 0.67, 0.67, 0.25, 0.39, 0.61, 0.53, 0.78,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.67, 0.72, 0.56, 0.72, 0.61, 0.50, 0.56, 0.67, 0.67, 0.89, 0.61, 0.61, 0.56,
        // [     \     ]     ^     _     `
        0.28, 0.31, 0.28, 0.47, 0.56, 0.34,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.56, 0.56, 0.50, 0.56, 0.56, 0.31, 0.56, 0.56, 0.22, 0.22, 0.53, 0.22, 0.83,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.56, 0.56, 0.56, 0.56, 0.33, 0.44, 0.39, 0.56, 0.50, 0.72, 0.50, 0.50, 0.44,
        // {     |     }     ~
        0.33, 0.26, 0.33, 0.59,
    ],
    average_char_width: 0.52,
    space_width: 0.25,
};

/// Approx. 90% of Inter.
static COMPUTER_MODERN_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.23, 0.27, 0.34, 0.50, 0.50, 0.80, 0.60, 0.20, 0.30, 0.30, 0.35, 0.53, 0.25, 0.30, 0.25, 0.28,
        // 0     1     2     3     4     5     6     7     8     9
        0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50,
        // :     ;     <     =     >     ?     @
        0.25, 0.25, 0.53, 0.53, 0.53, 0.45, 0.92,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.60, 0.55, 0.55, 0.60, 0.50, 0.45, 0.60, 0.60, 0.23, 0.35, 0.55, 0.48, 0.70,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.60, 0.65, 0.50, 0.65, 0.55, 0.45, 0.50, 0.60, 0.60, 0.80, 0.55, 0.55, 0.50,
        // [     \     ]     ^     _     `
        0.25, 0.28, 0.25, 0.42, 0.50, 0.31,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.50, 0.50, 0.45, 0.50, 0.50, 0.28, 0.50, 0.50, 0.20, 0.20, 0.48, 0.20, 0.75,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.50, 0.50, 0.50, 0.50, 0.30, 0.40, 0.35, 0.50, 0.45, 0.65, 0.45, 0.45, 0.40,
        // {     |     }     ~
        0.30, 0.23, 0.30, 0.53,
    ],
    average_char_width: 0.47,
    space_width: 0.23,
};

pub fn get_metrics(font: &FontFamily) -> &'static FontMetricTable {
    match font {
        FontFamily::Inter => &INTER_TABLE,
        FontFamily::ComputerModern => &COMPUTER_MODERN_TABLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_str_ascii_characters() {
        let metrics = get_metrics(&FontFamily::Inter);
        // "Rust" = R(0.61) + u(0.56) + s(0.44) + t(0.39) = 2.00
        let width = metrics.measure_str("Rust");
        assert!(
            (width - 2.00).abs() < 1e-3,
            "Rust width should be ~2.00, got {width}"
        );
    }

    #[test]
    fn test_measure_str_non_ascii_falls_back() {
        let metrics = get_metrics(&FontFamily::Inter);
        let width = metrics.measure_str("é");
        assert!((width - metrics.average_char_width).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_short_paragraph_is_one_line() {
        let metrics = get_metrics(&FontFamily::Inter);
        let config = default_page_config(FontFamily::Inter);
        assert_eq!(metrics.wrap("Dear Acme team,", &config), vec!["Dear Acme team,"]);
    }

    #[test]
    fn test_wrap_keeps_every_line_within_width() {
        let metrics = get_metrics(&FontFamily::Inter);
        let config = default_page_config(FontFamily::Inter);
        let paragraph = "I am excited to apply for the Engineer role at Acme. ".repeat(12);

        let lines = metrics.wrap(&paragraph, &config);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(
                metrics.measure_str(line) <= config.text_width_em,
                "line too wide: {line:?}"
            );
        }
        let rejoined = lines.join(" ");
        assert_eq!(
            rejoined.split_whitespace().count(),
            paragraph.split_whitespace().count()
        );
    }

    #[test]
    fn test_wrap_overlong_word_gets_own_line() {
        let metrics = get_metrics(&FontFamily::Inter);
        let config = default_page_config(FontFamily::Inter);
        let long_word = "x".repeat(200);

        let lines = metrics.wrap(&format!("a {long_word} b"), &config);

        assert_eq!(lines, vec!["a".to_string(), long_word, "b".to_string()]);
    }

    #[test]
    fn test_font_family_parses_config_spellings() {
        assert_eq!("inter".parse::<FontFamily>().unwrap(), FontFamily::Inter);
        assert_eq!(
            "Computer-Modern".parse::<FontFamily>().unwrap(),
            FontFamily::ComputerModern
        );
        assert!("helvetica".parse::<FontFamily>().is_err());
    }

    #[test]
    fn test_serif_table_wraps_more_per_line() {
        let paragraph = "Thank you for considering my application to the team. ".repeat(8);
        let sans = get_metrics(&FontFamily::Inter)
            .wrap(&paragraph, &default_page_config(FontFamily::Inter));
        let serif = get_metrics(&FontFamily::ComputerModern)
            .wrap(&paragraph, &default_page_config(FontFamily::ComputerModern));
        assert!(serif.len() <= sans.len());
    }

    #[test]
    fn test_wrap_blank_paragraph_is_empty() {
        let metrics = get_metrics(&FontFamily::ComputerModern);
        let config = default_page_config(FontFamily::ComputerModern);
        assert!(metrics.wrap("   ", &config).is_empty());
    }
}
