//! CSS length units.
//!
//! Diagram dimensions are given as CSS lengths (`"10cm"`, `"12pt"`, `"200"`).
//! These helpers convert them to and from SVG user units, taken to be CSS
//! pixels at 96 per inch.

use std::str::FromStr;

/// Pixels per `em`, the font size set by the diagram stylesheet.
pub const EM_SIZE: f64 = 16.0;
/// Pixels per `ex`.
pub const EX_SIZE: f64 = EM_SIZE / 2.0;

const CM_PER_INCH: f64 = 2.54;
const MM_PER_INCH: f64 = 10.0 * CM_PER_INCH;
const POINTS_PER_INCH: f64 = 72.0;
const PICAS_PER_INCH: f64 = 6.0;
const PIXELS_PER_INCH: f64 = 96.0;

/// A CSS length unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Px,
    In,
    Cm,
    Mm,
    Pt,
    Pc,
    Em,
    Ex,
    /// A percentage of the viewport, which cannot be resolved here.
    Percent,
}

impl Unit {
    const ALL: [Unit; 9] = [
        Unit::Px,
        Unit::In,
        Unit::Cm,
        Unit::Mm,
        Unit::Pt,
        Unit::Pc,
        Unit::Em,
        Unit::Ex,
        Unit::Percent,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::In => "in",
            Unit::Cm => "cm",
            Unit::Mm => "mm",
            Unit::Pt => "pt",
            Unit::Pc => "pc",
            Unit::Em => "em",
            Unit::Ex => "ex",
            Unit::Percent => "%",
        }
    }

    /// Pixels per unit, or `None` for percentages.
    pub fn pixels(self) -> Option<f64> {
        match self {
            Unit::Px => Some(1.0),
            Unit::In => Some(PIXELS_PER_INCH),
            Unit::Cm => Some(PIXELS_PER_INCH / CM_PER_INCH),
            Unit::Mm => Some(PIXELS_PER_INCH / MM_PER_INCH),
            Unit::Pt => Some(PIXELS_PER_INCH / POINTS_PER_INCH),
            Unit::Pc => Some(PIXELS_PER_INCH / PICAS_PER_INCH),
            Unit::Em => Some(EM_SIZE),
            Unit::Ex => Some(EX_SIZE),
            Unit::Percent => None,
        }
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::ALL
            .into_iter()
            .find(|unit| unit.suffix() == s)
            .ok_or_else(|| format!("unknown length unit `{s}`"))
    }
}

/// Converts a CSS length to pixels.
///
/// A bare number is taken as pixels. Returns `None` for percentages and for
/// text that is not a number.
///
/// ```
/// # use celldl_core::units::length_to_pixels;
/// assert_eq!(length_to_pixels("1in"), Some(96.0));
/// assert_eq!(length_to_pixels("250"), Some(250.0));
/// assert_eq!(length_to_pixels("50%"), None);
/// ```
pub fn length_to_pixels(length: &str) -> Option<f64> {
    let length = length.trim();
    let unit = Unit::ALL
        .into_iter()
        .find(|unit| length.ends_with(unit.suffix()));
    match unit {
        Some(unit) => {
            let number = length[..length.len() - unit.suffix().len()].trim();
            let value: f64 = number.parse().ok()?;
            unit.pixels().map(|scale| scale * value)
        }
        None => length.parse().ok(),
    }
}

/// Converts pixels to a CSS length in `units`, rounded to three decimals.
///
/// Returns `None` for percentages.
pub fn pixels_to_length(pixels: f64, units: Unit) -> Option<String> {
    let scale = units.pixels()?;
    let value = ((pixels * 1000.0) / scale).round() / 1000.0;
    Some(format!("{value}{}", units.suffix()))
}
