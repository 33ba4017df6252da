//! Route candidates: proposed joins between the two frontiers.

use wavegrid_core::{Direction, Point};

use crate::distance::{UNREACHABLE, hop_cost, step_cost};
use crate::store::GridStore;

/// A found route, start anchor first and finish anchor last.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub nodes: Vec<Point>,
    pub cost: i32,
}

impl Route {
    /// Number of steps (one less than the number of nodes).
    #[inline]
    pub fn steps(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

/// A proposed direct hop between a start-side tip (`left`) and a
/// finish-side tip (`right`).
///
/// Both tips are claimed cells (or anchors); the rest of the route is
/// recovered by walking their backpointer chains through the store. An
/// unset tip means "no route" and costs [`UNREACHABLE`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteCandidate {
    pub left: Option<Point>,
    pub right: Option<Point>,
}

impl RouteCandidate {
    #[inline]
    pub const fn new(left: Point, right: Point) -> Self {
        Self {
            left: Some(left),
            right: Some(right),
        }
    }

    /// The "no route" candidate.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            left: None,
            right: None,
        }
    }

    /// Total 4/6-weighted cost: the hop between the tips plus every link of
    /// both backpointer chains.
    pub fn cost(&self, store: &GridStore) -> i32 {
        let (Some(left), Some(right)) = (self.left, self.right) else {
            return UNREACHABLE;
        };
        hop_cost(left, right) + chain_cost(store, left) + chain_cost(store, right)
    }

    /// Reconstruct the full route, start anchor first. `None` if a tip is
    /// unset.
    pub fn nodes(&self, store: &GridStore) -> Option<Vec<Point>> {
        let (left, right) = (self.left?, self.right?);
        let mut nodes: Vec<Point> = Chain::new(store, left).collect();
        nodes.reverse();
        nodes.extend(Chain::new(store, right));
        Some(nodes)
    }

    /// Materialize the candidate into a [`Route`].
    pub fn into_route(self, store: &GridStore) -> Option<Route> {
        let nodes = self.nodes(store)?;
        Some(Route {
            nodes,
            cost: self.cost(store),
        })
    }
}

fn chain_cost(store: &GridStore, tip: Point) -> i32 {
    Chain::new(store, tip).links().map(step_cost).sum()
}

/// Walks a backpointer chain from a tip to its anchor, yielding every cell
/// including both ends.
struct Chain<'a> {
    store: &'a GridStore,
    next: Option<Point>,
    // Bounds the walk by the cell count even if the table was hand-edited
    // into a cycle.
    remaining: usize,
}

impl<'a> Chain<'a> {
    fn new(store: &'a GridStore, tip: Point) -> Self {
        Self {
            store,
            next: Some(tip),
            remaining: store.len(),
        }
    }

    /// The directions of the links traversed, tip first.
    fn links(self) -> impl Iterator<Item = Direction> + 'a {
        let store = self.store;
        self.filter_map(move |p| store.get(p).and_then(|c| c.mark()).and_then(|m| m.from))
    }
}

impl Iterator for Chain<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        let p = self.next.take()?;
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.next = self
            .store
            .get(p)
            .and_then(|c| c.mark())
            .and_then(|m| m.predecessor(p));
        Some(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Cell, Owner, PathMark};

    /// Lay a chain of `len` steps in direction `dir` starting from `anchor`,
    /// claimed by `owner`, and return its tip.
    fn lay_chain(
        store: &mut GridStore,
        owner: Owner,
        anchor: Point,
        dir: Direction,
        len: i32,
    ) -> Point {
        store.set_content(anchor, Cell::Mark(PathMark::anchor(owner)));
        let mut p = anchor;
        for _ in 0..len {
            let n = dir.step(p);
            assert!(store.claim(n, owner, dir.opposite()));
            p = n;
        }
        p
    }

    #[test]
    fn empty_candidate_is_unreachable() {
        let store = GridStore::new(4);
        let c = RouteCandidate::empty();
        assert_eq!(c.cost(&store), UNREACHABLE);
        assert_eq!(c.nodes(&store), None);
        let half = RouteCandidate {
            left: Some(Point::ZERO),
            right: None,
        };
        assert_eq!(half.cost(&store), UNREACHABLE);
        assert_eq!(half.into_route(&store), None);
    }

    #[test]
    fn axis_chain_cost() {
        for n in 0..6 {
            let mut store = GridStore::new(10);
            let left = lay_chain(&mut store, Owner::Start, Point::new(0, 0), Direction::E, n);
            let right = Point::new(left.x + 1, 0);
            store.set_content(right, Cell::Mark(PathMark::anchor(Owner::Finish)));
            let c = RouteCandidate::new(left, right);
            assert_eq!(c.cost(&store), 4 + 4 * n);
        }
    }

    #[test]
    fn diagonal_chain_cost() {
        for n in 0..6 {
            let mut store = GridStore::new(10);
            let right = lay_chain(&mut store, Owner::Finish, Point::new(9, 9), Direction::NW, n);
            let left = Point::new(right.x - 1, right.y - 1);
            store.set_content(left, Cell::Mark(PathMark::anchor(Owner::Start)));
            let c = RouteCandidate::new(left, right);
            assert_eq!(c.cost(&store), 6 + 6 * n);
        }
    }

    #[test]
    fn nodes_run_start_to_finish() {
        let mut store = GridStore::new(8);
        let left = lay_chain(&mut store, Owner::Start, Point::new(0, 0), Direction::SE, 2);
        let right = lay_chain(&mut store, Owner::Finish, Point::new(6, 2), Direction::W, 3);
        assert_eq!(left, Point::new(2, 2));
        assert_eq!(right, Point::new(3, 2));
        let c = RouteCandidate::new(left, right);
        let nodes = c.nodes(&store).unwrap();
        assert_eq!(
            nodes,
            vec![
                Point::new(0, 0),
                Point::new(1, 1),
                Point::new(2, 2),
                Point::new(3, 2),
                Point::new(4, 2),
                Point::new(5, 2),
                Point::new(6, 2),
            ]
        );
        assert_eq!(c.nodes(&store), Some(nodes));
        assert_eq!(c.cost(&store), 4 + 12 + 12);
    }

    #[test]
    fn into_route_counts_steps() {
        let mut store = GridStore::new(4);
        store.set_content(Point::new(0, 0), Cell::Mark(PathMark::anchor(Owner::Start)));
        store.set_content(Point::new(1, 1), Cell::Mark(PathMark::anchor(Owner::Finish)));
        let route = RouteCandidate::new(Point::new(0, 0), Point::new(1, 1))
            .into_route(&store)
            .unwrap();
        assert_eq!(route.cost, 6);
        assert_eq!(route.steps(), 1);
    }
}
