//! Display units for paper dimensions.
//!
//! Dimensions are stored in millidots; these helpers convert them for
//! display only and never feed back into stored values.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const MILLIDOTS_PER_MM: f64 = 2834.64567;
const MILLIDOTS_PER_INCH: f64 = 72000.0;
const MILLIDOTS_PER_POINT: f64 = 1000.0;

/// Unit used to show paper dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayUnits {
    #[default]
    #[serde(rename = "mm")]
    Millimetres,
    #[serde(rename = "inch")]
    Inches,
    #[serde(rename = "point")]
    Points,
}

impl DisplayUnits {
    /// Millidots per display unit.
    pub fn scale(self) -> f64 {
        match self {
            Self::Millimetres => MILLIDOTS_PER_MM,
            Self::Inches => MILLIDOTS_PER_INCH,
            Self::Points => MILLIDOTS_PER_POINT,
        }
    }

    /// Decimal places shown for this unit.
    pub fn precision(self) -> usize {
        match self {
            Self::Millimetres => 1,
            Self::Inches => 3,
            Self::Points => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Millimetres => "mm",
            Self::Inches => "inch",
            Self::Points => "point",
        }
    }

    /// Formats a millidot value in this unit.
    pub fn format(self, millidots: u32) -> String {
        format_dimension(millidots, self)
    }
}

impl Display for DisplayUnits {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Unit name not recognised by [`DisplayUnits::from_str`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownUnitsError(pub String);

impl Display for UnknownUnitsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown display units `{}`; expected mm|inch|point", self.0)
    }
}

impl Error for UnknownUnitsError {}

impl FromStr for DisplayUnits {
    type Err = UnknownUnitsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mm" | "millimetre" | "millimetres" | "millimeter" | "millimeters" => {
                Ok(Self::Millimetres)
            }
            "in" | "inch" | "inches" => Ok(Self::Inches),
            "pt" | "point" | "points" => Ok(Self::Points),
            other => Err(UnknownUnitsError(other.to_string())),
        }
    }
}

/// Formats a millidot dimension in the given unit with that unit's precision.
pub fn format_dimension(millidots: u32, units: DisplayUnits) -> String {
    let value = f64::from(millidots) / units.scale();
    format!("{value:.prec$}", prec = units.precision())
}

#[cfg(test)]
mod tests {
    use super::{format_dimension, DisplayUnits};

    #[test]
    fn formats_a4_in_each_unit() {
        // A4 is 595.276pt x 841.89pt.
        assert_eq!(format_dimension(595_276, DisplayUnits::Millimetres), "210.0");
        assert_eq!(format_dimension(841_890, DisplayUnits::Millimetres), "297.0");
        assert_eq!(format_dimension(595_276, DisplayUnits::Inches), "8.268");
        assert_eq!(format_dimension(595_276, DisplayUnits::Points), "595.3");
    }

    #[test]
    fn formats_small_values() {
        assert_eq!(format_dimension(29_700, DisplayUnits::Millimetres), "10.5");
        assert_eq!(format_dimension(0, DisplayUnits::Inches), "0.000");
    }

    #[test]
    fn parses_unit_names() {
        assert_eq!("MM".parse::<DisplayUnits>().unwrap(), DisplayUnits::Millimetres);
        assert_eq!(" inch ".parse::<DisplayUnits>().unwrap(), DisplayUnits::Inches);
        assert_eq!("pt".parse::<DisplayUnits>().unwrap(), DisplayUnits::Points);
        assert!("furlong".parse::<DisplayUnits>().is_err());
    }
}
