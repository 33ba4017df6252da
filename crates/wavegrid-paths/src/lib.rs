//! Bidirectional wavefront search on square grids.
//!
//! Two frontiers grow from a start and a finish anchor, one 8-connected
//! layer per tick, over a shared one-byte-per-cell [`GridStore`]. Each
//! claimed cell records a backpointer toward the cell it was expanded from,
//! so as soon as the frontiers touch, the route is recovered by walking both
//! chains. Axis steps cost 4 and diagonal steps cost 6.
//!
//! - [`SearchSession`] owns the grid and both [`Frontier`]s and advances the
//!   search one [`tick`](SearchSession::tick) at a time.
//! - [`TickScheduler`] runs ticks in batches sized to a frame budget and
//!   hands each batch's [`TickEvent`]s to a host for display.
//!
//! ```
//! use wavegrid_core::Point;
//! use wavegrid_paths::{SearchConfig, SearchSession, SearchState};
//!
//! let config = SearchConfig::new(5, Point::new(0, 0), Point::new(4, 4));
//! let mut session = SearchSession::new(&config).unwrap();
//! match session.run_to_end() {
//!     SearchState::Found(route) => assert_eq!(route.cost, 24),
//!     other => panic!("{other:?}"),
//! }
//! ```

mod distance;
mod error;
mod frontier;
mod route;
mod scheduler;
mod session;
mod store;

pub use distance::{AXIS_COST, CostTier, DIAGONAL_COST, UNREACHABLE, hop_cost, step_cost};
pub use error::SearchError;
pub use frontier::Frontier;
pub use route::{Route, RouteCandidate};
pub use scheduler::{
    Batch, Clock, DEFAULT_INITIAL_BATCH_SIZE, DEFAULT_TARGET_BATCH, MonotonicClock, PauseHandle,
    RunOutcome, RunStats, SchedulerConfig, Tick, TickScheduler,
};
pub use session::{Claim, SearchConfig, SearchSession, SearchState, TickEvent, TickOutcome, Ticks};
pub use store::{Cell, GridStore, Owner, PathMark};

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use wavegrid_core::Point;

    #[test]
    fn config_from_json() {
        let json = r#"{"side":4,"obstructions":[{"x":1,"y":1}],"start":{"x":0,"y":0},"finish":{"x":3,"y":3}}"#;
        let config: SearchConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.obstructions, vec![Point::new(1, 1)]);
        assert!(SearchSession::new(&config).is_ok());
    }

    #[test]
    fn tick_event_serializes() {
        let mut session =
            SearchSession::new(&SearchConfig::new(3, Point::new(0, 0), Point::new(2, 2))).unwrap();
        let event = session.tick();
        let json = serde_json::to_string(&event).unwrap();
        let back: TickEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
