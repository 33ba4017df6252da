//! Scenarios for the wavegrid search: random obstruction scatter, the null
//! (open grid) scenario, recorded scenario sets and result reports.

pub mod error;
pub mod report;
pub mod scatter;
pub mod scenario;

pub use error::ScenarioError;
pub use report::ScenarioReport;
pub use scatter::{ScatterConfig, ScatterGen};
pub use scenario::{DEFAULT_SIZE, Scenario, ScenarioSet};
