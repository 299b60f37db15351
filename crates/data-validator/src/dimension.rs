//! Measured dimensions

use crate::error::ValidationError;
use std::fmt;
use std::str::FromStr;

/// A measured quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    Length,
    Width,
    Height,
}

impl Dimension {
    /// All dimensions in display order
    pub const ALL: [Dimension; 3] = [Dimension::Length, Dimension::Width, Dimension::Height];

    /// Name as stored in the `measurements.dimension` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Length => "length",
            Dimension::Width => "width",
            Dimension::Height => "height",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "length" => Ok(Dimension::Length),
            "width" => Ok(Dimension::Width),
            "height" => Ok(Dimension::Height),
            _ => Err(ValidationError::UnknownDimension(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_dimensions() {
        assert_eq!("length".parse::<Dimension>().unwrap(), Dimension::Length);
        assert_eq!("Width".parse::<Dimension>().unwrap(), Dimension::Width);
        assert_eq!(" height ".parse::<Dimension>().unwrap(), Dimension::Height);
    }

    #[test]
    fn test_parse_unknown_dimension() {
        let err = "depth".parse::<Dimension>().unwrap_err();
        assert_eq!(err, ValidationError::UnknownDimension("depth".to_string()));
    }

    #[test]
    fn test_round_trips_through_column_name() {
        for dimension in Dimension::ALL {
            assert_eq!(dimension.as_str().parse::<Dimension>().unwrap(), dimension);
        }
    }
}
