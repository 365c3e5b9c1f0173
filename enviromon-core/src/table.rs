//! Ordered Range-Classification Tables
//!
//! Several parts of the engine map a number onto a category through a cascade
//! of interval tests: the barometric trend bands, the forecast rule table and
//! (per ladder) the air-quality levels. Writing them as nested `if` chains
//! hides gaps and overlaps, so they are expressed as data instead:
//!
//! ```text
//! Row 0: (-1.1, 1.1)   -> "-"
//! Row 1: (-4,  -1.1]   -> "<"
//! ...
//! Row n: (-inf, +inf)  -> fallback
//! ```
//!
//! Rows are tested in order and the **first** match wins. An
//! `Unbounded..Unbounded` row at the end acts as "otherwise" and also catches
//! NaN, which no bounded row contains.

/// One edge of an interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// No limit on this side
    Unbounded,
    /// Edge value excluded
    Open(f64),
    /// Edge value included
    Closed(f64),
}

/// Interval on the real line built from two [`Bound`]s
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    lower: Bound,
    upper: Bound,
}

impl Interval {
    /// Every value, NaN included
    pub const ALL: Interval = Interval::new(Bound::Unbounded, Bound::Unbounded);

    /// Interval between two bounds
    pub const fn new(lower: Bound, upper: Bound) -> Self {
        Self { lower, upper }
    }

    /// `(a, b)`
    pub const fn open(a: f64, b: f64) -> Self {
        Self::new(Bound::Open(a), Bound::Open(b))
    }

    /// `[a, b]`
    pub const fn closed(a: f64, b: f64) -> Self {
        Self::new(Bound::Closed(a), Bound::Closed(b))
    }

    /// `(a, b]`
    pub const fn open_closed(a: f64, b: f64) -> Self {
        Self::new(Bound::Open(a), Bound::Closed(b))
    }

    /// `[a, b)`
    pub const fn closed_open(a: f64, b: f64) -> Self {
        Self::new(Bound::Closed(a), Bound::Open(b))
    }

    /// `[a, +inf)`
    pub const fn at_least(a: f64) -> Self {
        Self::new(Bound::Closed(a), Bound::Unbounded)
    }

    /// `(a, +inf)`
    pub const fn above(a: f64) -> Self {
        Self::new(Bound::Open(a), Bound::Unbounded)
    }

    /// `(-inf, b]`
    pub const fn at_most(b: f64) -> Self {
        Self::new(Bound::Unbounded, Bound::Closed(b))
    }

    /// `(-inf, b)`
    pub const fn below(b: f64) -> Self {
        Self::new(Bound::Unbounded, Bound::Open(b))
    }

    /// True when `x` lies inside the interval
    pub fn contains(&self, x: f64) -> bool {
        let lower_ok = match self.lower {
            Bound::Unbounded => true,
            Bound::Open(a) => x > a,
            Bound::Closed(a) => x >= a,
        };
        let upper_ok = match self.upper {
            Bound::Unbounded => true,
            Bound::Open(b) => x < b,
            Bound::Closed(b) => x <= b,
        };
        lower_ok && upper_ok
    }
}

/// Single row of a [`RangeTable`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Row<T> {
    /// Values this row accepts
    pub interval: Interval,
    /// Category returned on match
    pub value: T,
}

impl<T> Row<T> {
    /// Row mapping `interval` to `value`
    pub const fn new(interval: Interval, value: T) -> Self {
        Self { interval, value }
    }
}

/// First-match-wins classification table over `'static` rows
#[derive(Debug, Clone, Copy)]
pub struct RangeTable<T: 'static> {
    rows: &'static [Row<T>],
}

impl<T: Copy> RangeTable<T> {
    /// Table over the given rows, tested in order
    pub const fn new(rows: &'static [Row<T>]) -> Self {
        Self { rows }
    }

    /// Category of the first row containing `x`
    pub fn classify(&self, x: f64) -> Option<T> {
        self.rows
            .iter()
            .find(|row| row.interval.contains(x))
            .map(|row| row.value)
    }

    /// Rows in evaluation order
    pub fn rows(&self) -> &'static [Row<T>] {
        self.rows
    }
}
