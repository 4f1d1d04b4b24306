use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::core::primitives::unix_seconds_to_datetime;
use crate::core::types::CategoryValue;

pub const MAX_PRECISION: u8 = 15;
const DEFAULT_MAX_FRACTION_DIGITS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayUnits {
    #[default]
    Auto,
    None,
    Thousands,
    Millions,
    Billions,
    Trillions,
}

impl DisplayUnits {
    #[must_use]
    pub fn divisor(self) -> f64 {
        match self {
            Self::Auto | Self::None => 1.0,
            Self::Thousands => 1e3,
            Self::Millions => 1e6,
            Self::Billions => 1e9,
            Self::Trillions => 1e12,
        }
    }

    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Auto | Self::None => "",
            Self::Thousands => "K",
            Self::Millions => "M",
            Self::Billions => "bn",
            Self::Trillions => "T",
        }
    }

    /// Picks the unit for values of the given magnitude.
    #[must_use]
    pub fn for_magnitude(magnitude: f64) -> Self {
        let magnitude = magnitude.abs();
        if magnitude >= 1e12 {
            Self::Trillions
        } else if magnitude >= 1e9 {
            Self::Billions
        } else if magnitude >= 1e6 {
            Self::Millions
        } else if magnitude >= 1e3 {
            Self::Thousands
        } else {
            Self::None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValueFormat {
    #[serde(default)]
    pub display_units: DisplayUnits,
    #[serde(default)]
    pub precision: Option<u8>,
}

impl ValueFormat {
    #[must_use]
    pub fn new(display_units: DisplayUnits, precision: Option<u8>) -> Self {
        Self {
            display_units,
            precision,
        }
    }

    /// Resolves `Auto` units against the magnitude of the axis domain.
    #[must_use]
    pub fn resolve(self, magnitude: f64) -> ResolvedValueFormat {
        let units = match self.display_units {
            DisplayUnits::Auto => DisplayUnits::for_magnitude(magnitude),
            other => other,
        };
        ResolvedValueFormat {
            units,
            precision: self.precision.map(|p| p.min(MAX_PRECISION)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedValueFormat {
    pub units: DisplayUnits,
    pub precision: Option<u8>,
}

impl ResolvedValueFormat {
    #[must_use]
    pub fn format(self, value: f64) -> String {
        let scaled = value / self.units.divisor();
        let mut text = format_decimal(scaled, self.precision);
        text.push_str(self.units.suffix());
        text
    }
}

/// Formats a number with fixed precision, or with up to two trimmed
/// fraction digits when no precision is given.
#[must_use]
pub fn format_decimal(value: f64, precision: Option<u8>) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let text = match precision {
        Some(digits) => format!("{:.*}", usize::from(digits), value),
        None => {
            let fixed = format!("{:.*}", DEFAULT_MAX_FRACTION_DIGITS, value);
            if fixed.contains('.') {
                fixed.trim_end_matches('0').trim_end_matches('.').to_owned()
            } else {
                fixed
            }
        }
    };
    normalize_negative_zero(text)
}

fn normalize_negative_zero(text: String) -> String {
    let is_zero = text
        .strip_prefix('-')
        .is_some_and(|rest| rest.chars().all(|ch| ch == '0' || ch == '.'));
    if is_zero {
        text[1..].to_owned()
    } else {
        text
    }
}

#[must_use]
pub fn format_category_label(category: &CategoryValue) -> String {
    match category {
        CategoryValue::Text(text) => text.clone(),
        CategoryValue::Number(value) => format_decimal(*value, None),
        CategoryValue::Time(seconds) => format_time_label(*seconds),
    }
}

/// Dates render as `YYYY-MM-DD`; a non-midnight time adds `HH:MM`.
#[must_use]
pub fn format_time_label(seconds: f64) -> String {
    match unix_seconds_to_datetime(seconds) {
        Some(time) if time.hour() == 0 && time.minute() == 0 && time.second() == 0 => {
            time.format("%Y-%m-%d").to_string()
        }
        Some(time) => time.format("%Y-%m-%d %H:%M").to_string(),
        None => format_decimal(seconds, None),
    }
}
