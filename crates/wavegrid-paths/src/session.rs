//! A single bidirectional search, advanced one tick at a time.

use std::iter::FusedIterator;

use wavegrid_core::Point;

use crate::distance::CostTier;
use crate::error::SearchError;
use crate::frontier::Frontier;
use crate::route::{Route, RouteCandidate};
use crate::store::{Cell, GridStore, Owner};

/// Everything needed to start a search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    /// Cells per grid row and column.
    pub side: i32,
    pub obstructions: Vec<Point>,
    pub start: Point,
    pub finish: Point,
}

impl SearchConfig {
    /// An obstruction-free search.
    pub fn new(side: i32, start: Point, finish: Point) -> Self {
        Self {
            side,
            obstructions: Vec::new(),
            start,
            finish,
        }
    }

    /// Set the obstruction list (builder).
    pub fn with_obstructions(mut self, obstructions: impl IntoIterator<Item = Point>) -> Self {
        self.obstructions = obstructions.into_iter().collect();
        self
    }
}

/// Where a search stands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchState {
    Searching,
    Found(Route),
    /// Both frontiers ran out of cells without meeting.
    Failed,
}

/// A cell claimed during a tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Claim {
    pub pos: Point,
    pub owner: Owner,
}

/// How a tick ended.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TickOutcome {
    Continuing,
    Found(Route),
    Failed,
}

/// Everything a renderer needs from one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickEvent {
    /// Cells claimed this tick, start frontier first.
    pub claimed: Vec<Claim>,
    pub outcome: TickOutcome,
}

impl TickEvent {
    /// Whether this is the last event of the search.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self.outcome, TickOutcome::Continuing)
    }
}

/// A bidirectional wavefront search between two anchors.
///
/// The session exclusively owns the grid and both frontiers. Each
/// [`tick`](Self::tick) first looks for a join between the frontiers and
/// only expands them when none exists, so the search stops on the very tick
/// a connection becomes possible.
#[derive(Clone, Debug)]
pub struct SearchSession {
    store: GridStore,
    start: Frontier,
    finish: Frontier,
    best: RouteCandidate,
    state: SearchState,
    ticks: u64,
}

impl SearchSession {
    /// Build the grid, place obstructions and anchors.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let side = config.side;
        if side <= 0 {
            return Err(SearchError::EmptyGrid(side));
        }
        let mut store = GridStore::new(side);
        let in_bounds = |pos: Point| {
            if store.contains(pos) {
                Ok(())
            } else {
                Err(SearchError::OutOfBounds { pos, side })
            }
        };
        in_bounds(config.start)?;
        in_bounds(config.finish)?;
        if let Some(&pos) = config.obstructions.iter().find(|&&p| in_bounds(p).is_err()) {
            return Err(SearchError::OutOfBounds { pos, side });
        }
        if config.start == config.finish {
            return Err(SearchError::AnchorsCoincide(config.start));
        }
        for &o in &config.obstructions {
            store.set_content(o, Cell::Obstruction);
        }
        for anchor in [config.start, config.finish] {
            if store.content_at(anchor).is_obstruction() {
                return Err(SearchError::AnchorObstructed(anchor));
            }
        }

        let start = Frontier::new(Owner::Start, config.start, &mut store);
        let finish = Frontier::new(Owner::Finish, config.finish, &mut store);
        log::debug!(
            "search {} -> {} on a {side}x{side} grid with {} obstructions",
            config.start,
            config.finish,
            config.obstructions.len()
        );
        Ok(Self {
            store,
            start,
            finish,
            best: RouteCandidate::empty(),
            state: SearchState::Searching,
            ticks: 0,
        })
    }

    #[inline]
    pub fn store(&self) -> &GridStore {
        &self.store
    }

    #[inline]
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        !matches!(self.state, SearchState::Searching)
    }

    /// The winning candidate, or the empty candidate while searching and
    /// after a failure.
    #[inline]
    pub fn best(&self) -> RouteCandidate {
        self.best
    }

    /// The found route, if any.
    pub fn route(&self) -> Option<&Route> {
        match &self.state {
            SearchState::Found(route) => Some(route),
            _ => None,
        }
    }

    /// Ticks that did work (terminal re-polls are not counted).
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[inline]
    pub fn start(&self) -> Point {
        self.start.anchor()
    }

    #[inline]
    pub fn finish(&self) -> Point {
        self.finish.anchor()
    }

    /// Run one tick: join check, link check, then expansion.
    ///
    /// Once the search has finished this returns the terminal outcome again
    /// with no claims.
    pub fn tick(&mut self) -> TickEvent {
        if self.is_finished() {
            return TickEvent {
                claimed: Vec::new(),
                outcome: self.outcome(),
            };
        }
        self.ticks += 1;

        let (start_anchor, finish_anchor) = (self.start.anchor(), self.finish.anchor());
        let direct = [
            self.start.try_direct_join(finish_anchor, true),
            self.finish.try_direct_join(start_anchor, true),
            self.start.try_direct_join(finish_anchor, false),
            self.finish.try_direct_join(start_anchor, false),
        ];
        if let Some(c) = self.cheapest(direct.into_iter().flatten()) {
            return self.conclude(c);
        }

        let links: Vec<RouteCandidate> = CostTier::ALL
            .into_iter()
            .flat_map(|tier| [&self.start, &self.finish].map(|f| f.link_at(tier, &self.store)))
            .flatten()
            .collect();
        if let Some(c) = self.cheapest(links.into_iter()) {
            return self.conclude(c);
        }

        let mut claimed = Vec::new();
        for frontier in [&mut self.start, &mut self.finish] {
            let owner = frontier.owner();
            claimed.extend(
                frontier
                    .expand_one_layer(&mut self.store)
                    .iter()
                    .map(|&pos| Claim { pos, owner }),
            );
        }
        log::trace!(
            "tick {}: start edge {}, finish edge {}",
            self.ticks,
            self.start.edge().len(),
            self.finish.edge().len()
        );

        if self.start.is_exhausted() && self.finish.is_exhausted() {
            self.state = SearchState::Failed;
            log::info!("no route after {} ticks", self.ticks);
        }
        TickEvent {
            claimed,
            outcome: self.outcome(),
        }
    }

    /// Iterate over tick events until the search finishes. The terminal
    /// event is the last item.
    pub fn ticks_iter(&mut self) -> Ticks<'_> {
        let done = self.is_finished();
        Ticks {
            session: self,
            done,
        }
    }

    /// Tick until finished and return the final state.
    pub fn run_to_end(&mut self) -> &SearchState {
        while !self.is_finished() {
            self.tick();
        }
        &self.state
    }

    fn cheapest(&self, candidates: impl Iterator<Item = RouteCandidate>) -> Option<RouteCandidate> {
        candidates.min_by_key(|c| c.cost(&self.store))
    }

    fn conclude(&mut self, candidate: RouteCandidate) -> TickEvent {
        self.best = candidate;
        self.state = match candidate.into_route(&self.store) {
            Some(route) => {
                log::info!(
                    "route found after {} ticks: cost {}, {} steps",
                    self.ticks,
                    route.cost,
                    route.steps()
                );
                SearchState::Found(route)
            }
            None => SearchState::Failed,
        };
        TickEvent {
            claimed: Vec::new(),
            outcome: self.outcome(),
        }
    }

    fn outcome(&self) -> TickOutcome {
        match &self.state {
            SearchState::Searching => TickOutcome::Continuing,
            SearchState::Found(route) => TickOutcome::Found(route.clone()),
            SearchState::Failed => TickOutcome::Failed,
        }
    }
}

/// Iterator over the remaining [`TickEvent`]s of a session.
///
/// Finite and not restartable: it ends after the terminal event, and a
/// fresh iterator over a finished session yields nothing.
pub struct Ticks<'a> {
    session: &'a mut SearchSession,
    done: bool,
}

impl Iterator for Ticks<'_> {
    type Item = TickEvent;

    fn next(&mut self) -> Option<TickEvent> {
        if self.done {
            return None;
        }
        let event = self.session.tick();
        self.done = event.is_terminal();
        Some(event)
    }
}

impl FusedIterator for Ticks<'_> {}
