use serde::{Deserialize, Serialize};

pub const DEFAULT_FONT_FAMILY: &str = "Segoe UI";
pub const DEFAULT_FONT_SIZE_PX: f64 = 12.0;
pub const ELLIPSIS: &str = "\u{2026}";

const LINE_HEIGHT_RATIO: f64 = 1.2;

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_owned()
}

fn default_font_size_px() -> f64 {
    DEFAULT_FONT_SIZE_PX
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size_px")]
    pub font_size_px: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_size_px: default_font_size_px(),
        }
    }
}

impl TextStyle {
    #[must_use]
    pub fn new(font_family: impl Into<String>, font_size_px: f64) -> Self {
        Self {
            font_family: font_family.into(),
            font_size_px,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TextSize {
    pub width: f64,
    pub height: f64,
}

impl TextSize {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Measures rendered text.
///
/// Implementations must be pure: the same text and style always produce the
/// same size. The axis layout loop relies on this to converge.
pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextSize;
}

impl<F> TextMeasurer for F
where
    F: Fn(&str, &TextStyle) -> TextSize,
{
    fn measure(&self, text: &str, style: &TextStyle) -> TextSize {
        self(text, style)
    }
}

/// Backend-independent width estimate based on per-glyph em units.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextSize {
        let font_size_px = style.font_size_px.max(0.0);
        TextSize::new(
            estimate_text_width_px(text, font_size_px),
            font_size_px * LINE_HEIGHT_RATIO,
        )
    }
}

#[must_use]
pub fn estimate_text_width_px(text: &str, font_size_px: f64) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    let units = text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.62,
            '.' | ',' => 0.34,
            '-' | '+' | '%' => 0.42,
            ' ' => 0.33,
            _ => 0.58,
        }
    });
    (units * font_size_px).max(font_size_px)
}

/// Shortens `text` with a trailing ellipsis until it fits `max_width`.
///
/// Returns an empty string when not even the ellipsis fits.
#[must_use]
pub fn tailor_text(
    text: &str,
    style: &TextStyle,
    max_width: f64,
    measurer: &dyn TextMeasurer,
) -> String {
    if measurer.measure(text, style).width <= max_width {
        return text.to_owned();
    }
    let chars: Vec<char> = text.chars().collect();
    for keep in (0..chars.len()).rev() {
        let mut candidate: String = chars[..keep].iter().collect();
        candidate.push_str(ELLIPSIS);
        if measurer.measure(&candidate, style).width <= max_width {
            return candidate;
        }
    }
    String::new()
}

/// Widest measured width among `texts`, `0.0` for none.
#[must_use]
pub fn max_text_width<'a>(
    texts: impl IntoIterator<Item = &'a str>,
    style: &TextStyle,
    measurer: &dyn TextMeasurer,
) -> f64 {
    texts
        .into_iter()
        .map(|text| measurer.measure(text, style).width)
        .fold(0.0, f64::max)
}
