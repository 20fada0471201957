//! Font size selection for the single displayed word.
//!
//! Short words get as large as the breakpoint allows; long words shrink until
//! they fit the column. Words longer than 15 and 20 characters are scaled down
//! again after clamping, which can land below the breakpoint minimum. That is
//! intended: a 25-character compound must still fit.

/// Returned when the viewport width is not known yet.
pub const FALLBACK_FONT_SIZE: u32 = 96;
/// Share of the column the word may occupy.
pub const AVAILABLE_WIDTH_FRACTION: f64 = 0.8;
/// Average glyph advance as a fraction of the font size.
pub const CHAR_WIDTH_RATIO: f64 = 0.6;

const LONG_WORD_THRESHOLD: usize = 15;
const LONG_WORD_FACTOR: f64 = 0.9;
const VERY_LONG_WORD_THRESHOLD: usize = 20;
const VERY_LONG_WORD_FACTOR: f64 = 0.85;

/// Viewport width thresholds and their clamp ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

impl Breakpoint {
    pub fn for_width(viewport_width_px: u32) -> Self {
        match viewport_width_px {
            0..640 => Breakpoint::Mobile,
            640..1024 => Breakpoint::Tablet,
            _ => Breakpoint::Desktop,
        }
    }

    pub fn font_range(self) -> (f64, f64) {
        match self {
            Breakpoint::Mobile => (32.0, 64.0),
            Breakpoint::Tablet => (48.0, 96.0),
            Breakpoint::Desktop => (64.0, 128.0),
        }
    }
}

/// Sizes words against the viewport, optionally capped by a maximum column width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlyphSizer {
    pub max_column_width: Option<u32>,
}

impl GlyphSizer {
    pub fn new(max_column_width: Option<u32>) -> Self {
        Self {
            max_column_width: max_column_width.filter(|width| *width > 0),
        }
    }

    pub fn font_size(&self, word_length: usize, viewport_width_px: u32) -> u32 {
        if viewport_width_px == 0 {
            return FALLBACK_FONT_SIZE;
        }
        let column = match self.max_column_width {
            Some(max) => viewport_width_px.min(max),
            None => viewport_width_px,
        };
        let available = column as f64 * AVAILABLE_WIDTH_FRACTION;
        let glyphs = word_length.max(1) as f64;
        let candidate = available / (glyphs * CHAR_WIDTH_RATIO);

        let (min, max) = Breakpoint::for_width(viewport_width_px).font_range();
        let mut size = candidate.clamp(min, max);

        if word_length > LONG_WORD_THRESHOLD {
            size *= LONG_WORD_FACTOR;
        }
        if word_length > VERY_LONG_WORD_THRESHOLD {
            size *= VERY_LONG_WORD_FACTOR;
        }

        size.floor() as u32
    }

    /// Convenience wrapper that measures `word` in `char`s.
    pub fn font_size_for_word(&self, word: &str, viewport_width_px: u32) -> u32 {
        self.font_size(word.chars().count(), viewport_width_px)
    }
}

/// Bare-viewport variant: no column cap.
pub fn resolve_font_size(word_length: usize, viewport_width_px: u32) -> u32 {
    GlyphSizer::default().font_size(word_length, viewport_width_px)
}
