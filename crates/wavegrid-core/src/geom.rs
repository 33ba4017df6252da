//! Grid addresses and the rectangles they live in.

use std::fmt;
use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A grid address. X grows right, Y grows down.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether `self` and `other` share a row or a column.
    #[inline]
    pub const fn is_aligned_with(self, other: Point) -> bool {
        self.x == other.x || self.y == other.y
    }

    /// Whether `other` is one of the eight cells surrounding `self`.
    #[inline]
    pub fn is_adjacent(self, other: Point) -> bool {
        self != other && (self.x - other.x).abs() <= 1 && (self.y - other.y).abs() <= 1
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// A half-open rectangle `[min, max)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub min: Point,
    pub max: Point,
}

impl Range {
    /// The rectangle spanned by two corners, in either order.
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    /// The square `[0, side)²`; empty for a non-positive side.
    #[inline]
    pub fn square(side: i32) -> Self {
        let side = side.max(0);
        Self {
            min: Point::ZERO,
            max: Point::new(side, side),
        }
    }

    #[inline]
    pub fn width(self) -> i32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(self) -> i32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Number of addresses covered.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.width() as usize * self.height() as usize
        }
    }

    #[inline]
    pub fn contains(self, p: Point) -> bool {
        (self.min.x..self.max.x).contains(&p.x) && (self.min.y..self.max.y).contains(&p.y)
    }

    /// Row `y`, counted from the top of the range. Empty if `y` is outside.
    pub fn line(self, y: i32) -> Self {
        if !(0..self.height()).contains(&y) {
            return Self::default();
        }
        let row = self.min.y + y;
        Self::new(self.min.x, row, self.max.x, row + 1)
    }

    /// Column `x`, counted from the left of the range. Empty if `x` is
    /// outside.
    pub fn column(self, x: i32) -> Self {
        if !(0..self.width()).contains(&x) {
            return Self::default();
        }
        let col = self.min.x + x;
        Self::new(col, self.min.y, col + 1, self.max.y)
    }

    /// Row-major iteration, matching the flat index `y * width + x`.
    #[inline]
    pub fn iter(self) -> RangeIter {
        RangeIter {
            range: self,
            next: 0,
            end: self.len(),
        }
    }
}

impl IntoIterator for Range {
    type Item = Point;
    type IntoIter = RangeIter;
    #[inline]
    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

/// Row-major iterator over the points in a [`Range`].
#[derive(Clone, Debug)]
pub struct RangeIter {
    range: Range,
    next: usize,
    end: usize,
}

impl RangeIter {
    #[inline]
    fn point(&self, i: usize) -> Point {
        let w = self.range.width() as usize;
        self.range.min + Point::new((i % w) as i32, (i / w) as i32)
    }
}

impl Iterator for RangeIter {
    type Item = Point;

    #[inline]
    fn next(&mut self) -> Option<Point> {
        if self.next >= self.end {
            return None;
        }
        let p = self.point(self.next);
        self.next += 1;
        Some(p)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.next;
        (n, Some(n))
    }
}

impl DoubleEndedIterator for RangeIter {
    #[inline]
    fn next_back(&mut self) -> Option<Point> {
        if self.next >= self.end {
            return None;
        }
        self.end -= 1;
        Some(self.point(self.end))
    }
}

impl ExactSizeIterator for RangeIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_and_alignment() {
        let p = Point::new(2, 2);
        assert!(p.is_adjacent(Point::new(3, 3)));
        assert!(p.is_adjacent(Point::new(2, 1)));
        assert!(!p.is_adjacent(p));
        assert!(!p.is_adjacent(Point::new(4, 2)));
        assert!(p.is_aligned_with(Point::new(2, 9)));
        assert!(!p.is_aligned_with(Point::new(3, 3)));
        assert_eq!(p + Point::new(1, -1) - p, Point::new(1, -1));
    }

    #[test]
    fn corners_in_any_order() {
        assert_eq!(Range::new(3, 2, 0, 0), Range::new(0, 0, 3, 2));
        let r = Range::new(0, 0, 3, 2);
        assert_eq!((r.width(), r.height(), r.len()), (3, 2, 6));
        assert!(r.contains(Point::new(2, 1)));
        assert!(!r.contains(Point::new(3, 0)));
        assert!(!r.contains(Point::new(0, -1)));
    }

    #[test]
    fn squares() {
        assert_eq!(Range::square(4).len(), 16);
        assert!(Range::square(0).is_empty());
        assert!(Range::square(-3).is_empty());
        assert_eq!(Range::square(-3).iter().count(), 0);
    }

    #[test]
    fn iteration_is_row_major() {
        let r = Range::new(1, 1, 4, 3);
        let pts: Vec<_> = r.iter().collect();
        assert_eq!(pts.len(), 6);
        assert_eq!(pts[0], Point::new(1, 1));
        assert_eq!(pts[3], Point::new(1, 2));
        assert_eq!(r.iter().rev().next(), Some(Point::new(3, 2)));
        assert_eq!(r.iter().len(), 6);
    }

    #[test]
    fn lines_and_columns() {
        let r = Range::square(5);
        let col: Vec<_> = r.column(2).iter().collect();
        assert_eq!(col.len(), 5);
        assert!(col.iter().all(|p| p.x == 2));
        let row: Vec<_> = r.line(4).into_iter().collect();
        assert_eq!(row.len(), 5);
        assert!(row.iter().all(|p| p.y == 4));
        assert!(r.column(5).is_empty());
        assert!(r.line(-1).is_empty());
    }
}
