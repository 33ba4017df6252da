//! Recorded search scenarios.
//!
//! A [`Scenario`] is everything needed to replay a search: grid size,
//! anchors, obstructions and optionally the cost the search is known to
//! find. With the `serde` feature scenarios read and write the JSON shape
//! used by recorded test sets:
//!
//! ```json
//! {"size": 10, "start": {"x": 2, "y": 2}, "finish": {"x": 7, "y": 7},
//!  "obstructions": [{"x": 3, "y": 4}], "correctLength": 30}
//! ```
//!
//! `size` defaults to [`DEFAULT_SIZE`] and unknown keys are ignored.

use wavegrid_core::Point;
use wavegrid_paths::{SearchConfig, SearchSession};

use crate::error::ScenarioError;

/// Grid side used when a scenario does not record one.
pub const DEFAULT_SIZE: i32 = 10;

#[cfg(feature = "serde")]
fn default_size() -> i32 {
    DEFAULT_SIZE
}

/// A replayable search setup.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scenario {
    #[cfg_attr(feature = "serde", serde(default = "default_size"))]
    pub size: i32,
    pub start: Point,
    pub finish: Point,
    #[cfg_attr(feature = "serde", serde(default))]
    pub obstructions: Vec<Point>,
    /// The cost a correct search finds, when known.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "correctLength", default, skip_serializing_if = "Option::is_none")
    )]
    pub correct_length: Option<i32>,
}

impl Scenario {
    /// An obstruction-free grid searched corner to corner.
    pub fn null(side: i32) -> Self {
        Self {
            size: side,
            start: Point::new(0, 0),
            finish: Point::new(side - 1, side - 1),
            obstructions: Vec::new(),
            correct_length: None,
        }
    }

    /// Record the expected cost (builder).
    pub fn with_correct_length(mut self, cost: i32) -> Self {
        self.correct_length = Some(cost);
        self
    }

    pub fn config(&self) -> SearchConfig {
        SearchConfig::new(self.size, self.start, self.finish)
            .with_obstructions(self.obstructions.iter().copied())
    }

    /// Build a search session over this scenario's grid.
    pub fn session(&self) -> Result<SearchSession, ScenarioError> {
        Ok(SearchSession::new(&self.config())?)
    }

    /// The scenario as one line of JSON.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, ScenarioError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// An ordered list of scenarios, stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ScenarioSet {
    scenarios: Vec<Scenario>,
}

impl ScenarioSet {
    pub fn new(scenarios: Vec<Scenario>) -> Self {
        Self { scenarios }
    }

    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a set from a JSON file.
    #[cfg(feature = "serde")]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let set = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::debug!("loaded {} scenarios from {}", set.len(), path.display());
        Ok(set)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Scenario, ScenarioError> {
        self.scenarios.get(index).ok_or(ScenarioError::IndexOutOfRange {
            index,
            len: self.scenarios.len(),
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scenario> {
        self.scenarios.iter()
    }

    pub fn push(&mut self, scenario: Scenario) {
        self.scenarios.push(scenario);
    }
}

impl<'a> IntoIterator for &'a ScenarioSet {
    type Item = &'a Scenario;
    type IntoIter = std::slice::Iter<'a, Scenario>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
