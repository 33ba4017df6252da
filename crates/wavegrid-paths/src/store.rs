//! The per-cell content table shared by both frontiers.
//!
//! [`GridStore`] keeps one byte per cell in row-major order. Backpointers
//! live in those bytes, so a route is an implicit linked list over the flat
//! array rather than a graph of nodes.

use wavegrid_core::{Direction, Point, Range};

/// Which frontier claimed a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Owner {
    Start,
    Finish,
}

impl Owner {
    /// The opposing frontier.
    #[inline]
    pub const fn other(self) -> Owner {
        match self {
            Owner::Start => Owner::Finish,
            Owner::Finish => Owner::Start,
        }
    }
}

/// A cell claimed by a frontier.
///
/// `from` is the backpointer: the direction from this cell toward the cell
/// it was expanded from. Anchors carry no backpointer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathMark {
    pub owner: Owner,
    pub from: Option<Direction>,
}

impl PathMark {
    /// The zero-step mark placed on a frontier's anchor.
    #[inline]
    pub const fn anchor(owner: Owner) -> Self {
        Self { owner, from: None }
    }

    #[inline]
    pub const fn is_anchor(self) -> bool {
        self.from.is_none()
    }

    /// The cell this mark was expanded from, if any.
    #[inline]
    pub fn predecessor(self, p: Point) -> Option<Point> {
        self.from.map(|d| d.step(p))
    }
}

/// Content of one grid cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cell {
    /// Unvisited and traversable.
    #[default]
    Empty,
    /// Permanently blocked.
    Obstruction,
    /// Claimed by a frontier.
    Mark(PathMark),
}

// Packed layout: bits 0..=2 direction, bit 3 owner, bit 4 mark, bit 5 anchor.
const EMPTY_BITS: u8 = 0;
const OBSTRUCTION_BITS: u8 = 1;
const DIRECTION_MASK: u8 = 0b0000_0111;
const FINISH_BIT: u8 = 0b0000_1000;
const MARK_BIT: u8 = 0b0001_0000;
const ANCHOR_BIT: u8 = 0b0010_0000;

impl Cell {
    /// Pack into the one-byte storage form.
    #[inline]
    pub const fn encode(self) -> u8 {
        match self {
            Cell::Empty => EMPTY_BITS,
            Cell::Obstruction => OBSTRUCTION_BITS,
            Cell::Mark(m) => {
                let owner = match m.owner {
                    Owner::Start => 0,
                    Owner::Finish => FINISH_BIT,
                };
                let from = match m.from {
                    Some(d) => d.index(),
                    None => ANCHOR_BIT,
                };
                MARK_BIT | owner | from
            }
        }
    }

    /// Unpack a byte produced by [`encode`](Self::encode). Bytes without the
    /// mark bit other than the obstruction value read as `Empty`.
    #[inline]
    pub const fn decode(bits: u8) -> Cell {
        if bits & MARK_BIT == 0 {
            return if bits == OBSTRUCTION_BITS {
                Cell::Obstruction
            } else {
                Cell::Empty
            };
        }
        let owner = if bits & FINISH_BIT == 0 {
            Owner::Start
        } else {
            Owner::Finish
        };
        let from = if bits & ANCHOR_BIT == 0 {
            Some(Direction::from_index(bits & DIRECTION_MASK))
        } else {
            None
        };
        Cell::Mark(PathMark { owner, from })
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    #[inline]
    pub const fn is_obstruction(self) -> bool {
        matches!(self, Cell::Obstruction)
    }

    #[inline]
    pub const fn mark(self) -> Option<PathMark> {
        match self {
            Cell::Mark(m) => Some(m),
            _ => None,
        }
    }

    #[inline]
    pub const fn owner(self) -> Option<Owner> {
        match self {
            Cell::Mark(m) => Some(m.owner),
            _ => None,
        }
    }
}

/// A square table of [`Cell`]s, `side` cells per row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridStore {
    side: i32,
    cells: Vec<u8>,
}

impl GridStore {
    /// Create a store of `side × side` empty cells. A non-positive side
    /// gives an empty store.
    pub fn new(side: i32) -> Self {
        let side = side.max(0);
        Self {
            side,
            cells: vec![EMPTY_BITS; (side as usize) * (side as usize)],
        }
    }

    /// Number of cells per row (and per column).
    #[inline]
    pub fn side(&self) -> i32 {
        self.side
    }

    /// The addressable square `[0, side)²`.
    #[inline]
    pub fn range(&self) -> Range {
        Range::square(self.side)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.range().contains(p)
    }

    /// Flat index of `p`, or `None` if out of range.
    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some((p.y as usize) * (self.side as usize) + (p.x as usize))
    }

    #[inline]
    #[track_caller]
    fn index(&self, p: Point) -> usize {
        match self.idx(p) {
            Some(i) => i,
            None => panic!(
                "grid address {p} outside [0, {})\u{b2}",
                self.side
            ),
        }
    }

    /// Checked read: `None` outside the grid.
    #[inline]
    pub fn get(&self, p: Point) -> Option<Cell> {
        self.idx(p).map(|i| Cell::decode(self.cells[i]))
    }

    /// Content of `p`.
    ///
    /// # Panics
    ///
    /// If `p` lies outside `[0, side)²`.
    #[inline]
    #[track_caller]
    pub fn content_at(&self, p: Point) -> Cell {
        Cell::decode(self.cells[self.index(p)])
    }

    /// Overwrite the content of `p`, honouring the cell life cycle: only
    /// `Empty` cells change, and writing the current value is a no-op.
    /// Returns whether the cell now holds `cell`.
    ///
    /// # Panics
    ///
    /// If `p` lies outside `[0, side)²`, and in debug builds on an illegal
    /// transition (rewriting an obstruction or a claimed cell).
    #[track_caller]
    pub fn set_content(&mut self, p: Point, cell: Cell) -> bool {
        let i = self.index(p);
        let current = Cell::decode(self.cells[i]);
        if current == cell {
            return true;
        }
        if !current.is_empty() {
            debug_assert!(false, "illegal transition at {p}: {current:?} -> {cell:?}");
            return false;
        }
        self.cells[i] = cell.encode();
        true
    }

    /// Claim `p` for `owner` with a backpointer `from`, if it is empty.
    ///
    /// Out-of-range addresses, obstructions and claimed cells are left
    /// untouched and return `false`. First writer wins.
    #[inline]
    pub fn claim(&mut self, p: Point, owner: Owner, from: Direction) -> bool {
        let Some(i) = self.idx(p) else {
            return false;
        };
        if self.cells[i] != EMPTY_BITS {
            return false;
        }
        self.cells[i] = Cell::Mark(PathMark {
            owner,
            from: Some(from),
        })
        .encode();
        true
    }

    /// Row-major iterator over `(Point, Cell)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Cell)> + '_ {
        self.range()
            .iter()
            .zip(self.cells.iter())
            .map(|(p, &bits)| (p, Cell::decode(bits)))
    }

    /// Count the cells satisfying a predicate.
    pub fn count(&self, mut f: impl FnMut(Cell) -> bool) -> usize {
        self.cells.iter().filter(|&&bits| f(Cell::decode(bits))).count()
    }

    /// The packed row-major byte table.
    #[inline]
    pub fn raw(&self) -> &[u8] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_is_empty() {
        let s = GridStore::new(4);
        assert_eq!(s.len(), 16);
        assert_eq!(s.side(), 4);
        assert_eq!(s.count(Cell::is_empty), 16);
        assert!(GridStore::new(0).is_empty());
        assert!(GridStore::new(-2).is_empty());
    }

    #[test]
    fn encoding_round_trips_every_variant() {
        let mut cells = vec![Cell::Empty, Cell::Obstruction];
        for owner in [Owner::Start, Owner::Finish] {
            cells.push(Cell::Mark(PathMark::anchor(owner)));
            for d in Direction::ALL {
                cells.push(Cell::Mark(PathMark {
                    owner,
                    from: Some(d),
                }));
            }
        }
        let mut seen = std::collections::HashSet::new();
        for c in cells {
            let bits = c.encode();
            assert!(seen.insert(bits), "duplicate encoding for {c:?}");
            assert_eq!(Cell::decode(bits), c);
        }
    }

    #[test]
    fn owner_and_direction_fit_in_a_nibble() {
        for owner in [Owner::Start, Owner::Finish] {
            for d in Direction::ALL {
                let bits = Cell::Mark(PathMark {
                    owner,
                    from: Some(d),
                })
                .encode();
                assert!(bits & !MARK_BIT < 16);
            }
        }
    }

    #[test]
    fn set_and_get() {
        let mut s = GridStore::new(3);
        let p = Point::new(2, 1);
        assert!(s.set_content(p, Cell::Obstruction));
        assert_eq!(s.content_at(p), Cell::Obstruction);
        assert_eq!(s.get(p), Some(Cell::Obstruction));
        assert_eq!(s.get(Point::new(3, 0)), None);
        assert_eq!(s.raw()[5], OBSTRUCTION_BITS);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn content_at_out_of_bounds_panics() {
        let s = GridStore::new(3);
        s.content_at(Point::new(0, 3));
    }

    #[test]
    fn claim_is_first_writer_wins() {
        let mut s = GridStore::new(3);
        let p = Point::new(1, 1);
        assert!(s.claim(p, Owner::Start, Direction::W));
        assert!(!s.claim(p, Owner::Finish, Direction::E));
        assert_eq!(s.content_at(p).owner(), Some(Owner::Start));
        assert_eq!(
            s.content_at(p).mark().and_then(|m| m.predecessor(p)),
            Some(Point::new(0, 1))
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "illegal transition")]
    fn rewriting_an_obstruction_panics_in_debug() {
        let mut s = GridStore::new(3);
        let p = Point::new(1, 1);
        s.set_content(p, Cell::Obstruction);
        s.set_content(p, Cell::Mark(PathMark::anchor(Owner::Start)));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "illegal transition")]
    fn handing_a_mark_to_the_other_owner_panics_in_debug() {
        let mut s = GridStore::new(3);
        let p = Point::new(0, 2);
        s.set_content(p, Cell::Mark(PathMark::anchor(Owner::Start)));
        s.set_content(p, Cell::Mark(PathMark::anchor(Owner::Finish)));
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn illegal_transitions_are_refused() {
        let mut s = GridStore::new(3);
        let p = Point::new(1, 1);
        s.set_content(p, Cell::Obstruction);
        assert!(!s.set_content(p, Cell::Mark(PathMark::anchor(Owner::Start))));
        assert_eq!(s.content_at(p), Cell::Obstruction);
    }

    #[test]
    fn rewriting_the_same_content_is_a_no_op() {
        let mut s = GridStore::new(3);
        let p = Point::new(2, 2);
        let mark = Cell::Mark(PathMark::anchor(Owner::Finish));
        assert!(s.set_content(p, mark));
        assert!(s.set_content(p, mark));
        assert_eq!(s.content_at(p), mark);
    }

    #[test]
    fn refused_claim_leaves_the_cell_unchanged() {
        let mut s = GridStore::new(3);
        let p = Point::new(1, 0);
        assert!(s.claim(p, Owner::Finish, Direction::SE));
        let before = s.raw().to_vec();
        assert!(!s.claim(p, Owner::Start, Direction::W));
        assert!(!s.claim(p, Owner::Finish, Direction::N));
        assert_eq!(s.raw(), &before[..]);
        assert_eq!(
            s.content_at(p),
            Cell::Mark(PathMark {
                owner: Owner::Finish,
                from: Some(Direction::SE),
            })
        );
    }

    #[test]
    fn claim_skips_obstructions_and_outside() {
        let mut s = GridStore::new(3);
        s.set_content(Point::new(0, 0), Cell::Obstruction);
        assert!(!s.claim(Point::new(0, 0), Owner::Start, Direction::N));
        assert!(!s.claim(Point::new(-1, 0), Owner::Start, Direction::N));
        assert_eq!(s.content_at(Point::new(0, 0)), Cell::Obstruction);
    }

    #[test]
    fn iter_is_row_major() {
        let mut s = GridStore::new(2);
        s.set_content(Point::new(1, 0), Cell::Obstruction);
        let items: Vec<_> = s.iter().collect();
        assert_eq!(items.len(), 4);
        assert_eq!(items[1], (Point::new(1, 0), Cell::Obstruction));
        assert_eq!(items[2], (Point::new(0, 1), Cell::Empty));
    }
}
