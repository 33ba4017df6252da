use wavegrid_core::{Direction, Point};

/// Cost of one axis-aligned step.
pub const AXIS_COST: i32 = 4;

/// Cost of one diagonal step. 6 / 4 = 1.5 stands in for √2.
pub const DIAGONAL_COST: i32 = 6;

/// Sentinel cost of a route that does not exist.
pub const UNREACHABLE: i32 = i32::MAX;

/// The two step costs at which frontier cells can touch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CostTier {
    Axis,
    Diagonal,
}

impl CostTier {
    /// Both tiers, cheapest first.
    pub const ALL: [CostTier; 2] = [CostTier::Axis, CostTier::Diagonal];

    #[inline]
    pub const fn cost(self) -> i32 {
        match self {
            CostTier::Axis => AXIS_COST,
            CostTier::Diagonal => DIAGONAL_COST,
        }
    }

    /// Directions whose single step belongs to this tier.
    #[inline]
    pub const fn directions(self) -> &'static [Direction; 4] {
        match self {
            CostTier::Axis => &Direction::AXIS,
            CostTier::Diagonal => &Direction::DIAGONAL,
        }
    }

    /// Whether `a` and `b` are neighbours joined by a step of this tier.
    #[inline]
    pub fn joins(self, a: Point, b: Point) -> bool {
        a.is_adjacent(b) && (hop_cost(a, b) == self.cost())
    }
}

/// Cost of a single step in direction `d`.
#[inline]
pub const fn step_cost(d: Direction) -> i32 {
    if d.is_diagonal() { DIAGONAL_COST } else { AXIS_COST }
}

/// Cost of the direct hop joining two frontier tips: axis cost when they
/// share a row or column, diagonal cost otherwise.
#[inline]
pub const fn hop_cost(a: Point, b: Point) -> i32 {
    if a.is_aligned_with(b) { AXIS_COST } else { DIAGONAL_COST }
}
