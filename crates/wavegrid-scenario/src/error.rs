use std::fmt;
use std::io;

use wavegrid_paths::SearchError;

/// Errors raised while generating, loading or instantiating scenarios.
#[derive(Debug)]
pub enum ScenarioError {
    /// Reading a scenario file failed.
    Io(io::Error),
    /// A scenario file is not valid JSON of the expected shape.
    #[cfg(feature = "serde")]
    Json(serde_json::Error),
    /// The grid is too small to hold two distinct anchors.
    GridTooSmall(i32),
    /// A scenario index past the end of its set.
    IndexOutOfRange { index: usize, len: usize },
    /// The scenario's geometry cannot start a search.
    Invalid(SearchError),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "scenario file: {e}"),
            #[cfg(feature = "serde")]
            Self::Json(e) => write!(f, "scenario JSON: {e}"),
            Self::GridTooSmall(side) => {
                write!(f, "a {side}x{side} grid cannot hold two distinct anchors")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "scenario {index} requested but the set holds {len}")
            }
            Self::Invalid(e) => write!(f, "invalid scenario: {e}"),
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "serde")]
            Self::Json(e) => Some(e),
            Self::Invalid(e) => Some(e),
            Self::GridTooSmall(_) | Self::IndexOutOfRange { .. } => None,
        }
    }
}

impl From<io::Error> for ScenarioError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for ScenarioError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<SearchError> for ScenarioError {
    fn from(e: SearchError) -> Self {
        Self::Invalid(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use wavegrid_core::Point;

    #[test]
    fn display_and_source() {
        let e = ScenarioError::from(SearchError::AnchorsCoincide(Point::new(1, 2)));
        assert!(e.to_string().starts_with("invalid scenario: "));
        assert!(e.source().is_some());
        let e = ScenarioError::IndexOutOfRange { index: 4, len: 2 };
        assert_eq!(e.to_string(), "scenario 4 requested but the set holds 2");
        assert!(e.source().is_none());
    }
}
