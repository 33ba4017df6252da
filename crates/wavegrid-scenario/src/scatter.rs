//! Random obstruction scatter.

use rand::{Rng, RngExt};
use wavegrid_core::{Point, Range};

use crate::error::ScenarioError;
use crate::scenario::Scenario;

/// Smallest side for which the inset corner anchors are distinct and in
/// range.
const MIN_CORNER_SIDE: i32 = 6;

/// Parameters for [`ScatterGen`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScatterConfig {
    /// Probability that any one cell is obstructed.
    pub density: f64,
    /// Place the anchors two cells in from opposite corners rather than at
    /// random. An anchor in the corner itself is walled in by its three
    /// neighbours far more often.
    pub corner_to_corner: bool,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            density: 0.5,
            corner_to_corner: true,
        }
    }
}

/// Generates random scenarios.
pub struct ScatterGen<R: Rng> {
    pub rng: R,
    pub config: ScatterConfig,
}

impl<R: Rng> ScatterGen<R> {
    pub fn new(rng: R) -> Self {
        Self::with_config(ScatterConfig::default(), rng)
    }

    pub fn with_config(config: ScatterConfig, rng: R) -> Self {
        Self { rng, config }
    }

    /// Scatter obstructions over a `side × side` grid and place two anchors.
    ///
    /// Every cell is obstructed independently with probability `density`;
    /// the anchor cells are then cleared. Corner mode falls back to random
    /// anchors on grids smaller than 6×6.
    pub fn generate(&mut self, side: i32) -> Result<Scenario, ScenarioError> {
        if side < 2 {
            return Err(ScenarioError::GridTooSmall(side));
        }
        let density = self.config.density;
        let mut obstructions: Vec<Point> = Range::square(side)
            .iter()
            .filter(|_| self.rng.random::<f64>() < density)
            .collect();

        let (start, finish) = if self.config.corner_to_corner && side >= MIN_CORNER_SIDE {
            (Point::new(2, 2), Point::new(side - 3, side - 3))
        } else {
            let start = self.random_cell(side);
            let mut finish = self.random_cell(side);
            while finish == start {
                finish = self.random_cell(side);
            }
            (start, finish)
        };
        obstructions.retain(|&p| p != start && p != finish);

        log::debug!(
            "scattered {} obstructions on a {side}x{side} grid, {start} -> {finish}",
            obstructions.len()
        );
        Ok(Scenario {
            size: side,
            start,
            finish,
            obstructions,
            correct_length: None,
        })
    }

    fn random_cell(&mut self, side: i32) -> Point {
        Point::new(self.rng.random_range(0..side), self.rng.random_range(0..side))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn seeded(config: ScatterConfig, seed: u64) -> ScatterGen<StdRng> {
        ScatterGen::with_config(config, StdRng::seed_from_u64(seed))
    }

    #[test]
    fn same_seed_same_scenario() {
        let a = seeded(ScatterConfig::default(), 7).generate(20).unwrap();
        let b = seeded(ScatterConfig::default(), 7).generate(20).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn corner_anchors_are_inset() {
        let s = seeded(ScatterConfig::default(), 1).generate(12).unwrap();
        assert_eq!(s.start, Point::new(2, 2));
        assert_eq!(s.finish, Point::new(9, 9));
        assert!(!s.obstructions.contains(&s.start));
        assert!(!s.obstructions.contains(&s.finish));
        assert!(s.session().is_ok());
    }

    #[test]
    fn density_extremes() {
        let empty = ScatterConfig {
            density: 0.0,
            ..ScatterConfig::default()
        };
        assert!(seeded(empty, 3).generate(8).unwrap().obstructions.is_empty());

        let full = ScatterConfig {
            density: 1.0,
            ..ScatterConfig::default()
        };
        let s = seeded(full, 3).generate(8).unwrap();
        assert_eq!(s.obstructions.len(), 64 - 2);
    }

    #[test]
    fn density_is_roughly_honoured() {
        let s = seeded(ScatterConfig::default(), 11).generate(64).unwrap();
        let fraction = s.obstructions.len() as f64 / (64.0 * 64.0);
        assert!((0.45..0.55).contains(&fraction), "fraction {fraction}");
    }

    #[test]
    fn random_anchors_are_distinct_and_in_range() {
        let config = ScatterConfig {
            corner_to_corner: false,
            ..ScatterConfig::default()
        };
        let mut generator = seeded(config, 5);
        for _ in 0..50 {
            let s = generator.generate(2).unwrap();
            assert_ne!(s.start, s.finish);
            assert!(Range::square(2).contains(s.start));
            assert!(Range::square(2).contains(s.finish));
            assert!(s.session().is_ok());
        }
    }

    #[test]
    fn small_grids_fall_back_to_random_anchors() {
        let s = seeded(ScatterConfig::default(), 9).generate(5).unwrap();
        assert_ne!(s.start, s.finish);
        assert!(s.session().is_ok());
    }

    #[test]
    fn degenerate_grid_is_rejected() {
        assert!(matches!(
            seeded(ScatterConfig::default(), 0).generate(1),
            Err(ScenarioError::GridTooSmall(1))
        ));
    }
}
