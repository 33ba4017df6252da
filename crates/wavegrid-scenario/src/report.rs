use std::fmt;
use std::time::Duration;

use wavegrid_paths::SearchState;

/// One row of the results table: what a run found against what was
/// expected.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioReport {
    pub label: String,
    /// Route cost, `None` for a miss.
    pub cost: Option<i32>,
    /// Time spent inside ticks.
    pub inner: Duration,
    pub expected: Option<i32>,
    pub matches_expected: bool,
}

impl ScenarioReport {
    /// Summarize a finished search. A run with no expected cost always
    /// matches.
    pub fn new(
        label: impl Into<String>,
        state: &SearchState,
        inner: Duration,
        expected: Option<i32>,
    ) -> Self {
        let label = label.into();
        let cost = match state {
            SearchState::Found(route) => Some(route.cost),
            SearchState::Searching | SearchState::Failed => None,
        };
        let matches_expected = expected.is_none_or(|e| cost == Some(e));
        if !matches_expected {
            log::warn!(
                "{label}: found {}, expected {}",
                cost.map_or_else(|| "no route".to_owned(), |c| c.to_string()),
                expected.unwrap_or_default()
            );
        }
        Self {
            label,
            cost,
            inner,
            expected,
            matches_expected,
        }
    }

    /// Label for a scenario taken from a set.
    pub fn indexed_label(index: usize) -> String {
        format!("Test {index}")
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<14}", self.label)?;
        match self.cost {
            Some(c) => write!(f, "{c:>8}")?,
            None => write!(f, "{:>8}", "miss")?,
        }
        write!(f, "{:>10}ms", self.inner.as_millis())?;
        match self.expected {
            Some(e) => write!(f, "{e:>8}")?,
            None => write!(f, "{:>8}", "N/A")?,
        }
        if !self.matches_expected {
            write!(f, "  MISMATCH")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavegrid_core::Point;
    use wavegrid_paths::Route;

    fn found(cost: i32) -> SearchState {
        SearchState::Found(Route {
            nodes: vec![Point::new(0, 0), Point::new(1, 1)],
            cost,
        })
    }

    #[test]
    fn matching_and_missing_expectations() {
        let r = ScenarioReport::new("Random test", &found(24), Duration::from_millis(3), None);
        assert_eq!(r.cost, Some(24));
        assert!(r.matches_expected);

        let r = ScenarioReport::new("Test 0", &found(24), Duration::ZERO, Some(24));
        assert!(r.matches_expected);

        let r = ScenarioReport::new("Test 1", &found(30), Duration::ZERO, Some(24));
        assert!(!r.matches_expected);

        let r = ScenarioReport::new("Test 2", &SearchState::Failed, Duration::ZERO, Some(24));
        assert_eq!(r.cost, None);
        assert!(!r.matches_expected);
    }

    #[test]
    fn row_format() {
        let r = ScenarioReport::new(
            ScenarioReport::indexed_label(3),
            &SearchState::Failed,
            Duration::from_millis(12),
            None,
        );
        let row = r.to_string();
        assert!(row.starts_with("Test 3"));
        assert!(row.contains("miss"));
        assert!(row.contains("12ms"));
        assert!(row.contains("N/A"));
        assert!(!row.contains("MISMATCH"));
    }
}
