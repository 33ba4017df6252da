//! One side of the bidirectional search.

use wavegrid_core::{Direction, Point};

use crate::distance::CostTier;
use crate::route::RouteCandidate;
use crate::store::{Cell, GridStore, Owner, PathMark};

/// A wavefront growing layer by layer from its anchor.
///
/// The edge set is the outermost ring of claimed cells: the only cells
/// expanded on the next layer and the only ones checked for meetings.
#[derive(Clone, Debug)]
pub struct Frontier {
    owner: Owner,
    anchor: Point,
    edge: Vec<Point>,
    // scratch buffer for the next layer, swapped with `edge`
    next: Vec<Point>,
    claimed: usize,
}

impl Frontier {
    /// Create a frontier and mark its anchor in `store` as the zero-step
    /// mark. The caller has checked that the anchor is in range and empty.
    pub fn new(owner: Owner, anchor: Point, store: &mut GridStore) -> Self {
        store.set_content(anchor, Cell::Mark(PathMark::anchor(owner)));
        Self {
            owner,
            anchor,
            edge: vec![anchor],
            next: Vec::new(),
            claimed: 1,
        }
    }

    #[inline]
    pub fn owner(&self) -> Owner {
        self.owner
    }

    #[inline]
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// The current edge set.
    #[inline]
    pub fn edge(&self) -> &[Point] {
        &self.edge
    }

    /// Total cells claimed, anchor included.
    #[inline]
    pub fn claimed(&self) -> usize {
        self.claimed
    }

    /// Whether the last expansion claimed nothing.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.edge.is_empty()
    }

    /// Look for an edge cell adjacent to the opposite anchor.
    ///
    /// With `prefer_diagonal` the whole edge is scanned for a diagonal
    /// neighbour before an axis one; otherwise axis neighbours come first.
    /// The first match in edge order wins.
    pub fn try_direct_join(&self, target: Point, prefer_diagonal: bool) -> Option<RouteCandidate> {
        let tiers = if prefer_diagonal {
            [CostTier::Diagonal, CostTier::Axis]
        } else {
            [CostTier::Axis, CostTier::Diagonal]
        };
        tiers.into_iter().find_map(|tier| {
            self.edge
                .iter()
                .find(|&&p| tier.joins(p, target))
                .map(|&p| self.candidate(p, target))
        })
    }

    /// Look for an edge cell touching, at the given tier, any cell already
    /// claimed by the other frontier. Returns the cheapest such join.
    pub fn link_at(&self, tier: CostTier, store: &GridStore) -> Option<RouteCandidate> {
        let other = self.owner.other();
        self.edge
            .iter()
            .flat_map(|&p| tier.directions().iter().map(move |d| (p, d.step(p))))
            .filter(|&(_, q)| store.get(q).and_then(Cell::owner) == Some(other))
            .map(|(p, q)| self.candidate(p, q))
            .min_by_key(|c| c.cost(store))
    }

    /// Claim every empty neighbour of the edge set and make those cells the
    /// new edge set. Returns the newly claimed cells; an empty slice means
    /// the frontier is exhausted.
    ///
    /// Cells already owned by either frontier and obstructions are skipped;
    /// a meeting with the other frontier is left to [`link_at`](Self::link_at).
    pub fn expand_one_layer(&mut self, store: &mut GridStore) -> &[Point] {
        self.next.clear();
        for &p in &self.edge {
            for d in Direction::ALL {
                let n = d.step(p);
                if store.claim(n, self.owner, d.opposite()) {
                    self.next.push(n);
                }
            }
        }
        std::mem::swap(&mut self.edge, &mut self.next);
        self.claimed += self.edge.len();
        &self.edge
    }

    /// Orient a join so that the start-side tip is always `left`.
    fn candidate(&self, mine: Point, theirs: Point) -> RouteCandidate {
        match self.owner {
            Owner::Start => RouteCandidate::new(mine, theirs),
            Owner::Finish => RouteCandidate::new(theirs, mine),
        }
    }
}
