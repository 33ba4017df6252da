use std::fmt;

use wavegrid_core::Point;

/// Precondition violations detected while building a [`SearchSession`].
///
/// These are programmer errors: the session is never created. A search that
/// runs and finds no route is not an error, see
/// [`SearchState::Failed`](crate::SearchState::Failed).
///
/// [`SearchSession`]: crate::SearchSession
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The grid side is zero or negative.
    EmptyGrid(i32),
    /// An anchor or obstruction lies outside `[0, side)²`.
    OutOfBounds { pos: Point, side: i32 },
    /// An anchor was placed on an obstruction.
    AnchorObstructed(Point),
    /// Start and finish are the same cell.
    AnchorsCoincide(Point),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid(side) => write!(f, "grid side must be positive, got {side}"),
            Self::OutOfBounds { pos, side } => {
                write!(f, "grid address {pos} is outside [0, {side})\u{b2}")
            }
            Self::AnchorObstructed(pos) => write!(f, "anchor {pos} is on an obstruction"),
            Self::AnchorsCoincide(pos) => write!(f, "start and finish are both {pos}"),
        }
    }
}

impl std::error::Error for SearchError {}
