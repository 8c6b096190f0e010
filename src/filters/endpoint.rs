//! Interval endpoints used to fold range constraints.
//!
//! A range is a pair of endpoints; an absent value means the interval is
//! unbounded on that side (-∞ on the left, +∞ on the right). Tightening a
//! range keeps the greater of two left endpoints and the lesser of two
//! right endpoints, where ties on value are broken toward the stricter
//! (exclusive) bound.

use crate::value::Value;

/// Which side of the interval an endpoint sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// One endpoint of a range: an optional value, inclusivity, and side.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub value: Option<Value>,
    pub include: bool,
    pub side: Side,
}

impl Endpoint {
    pub fn new(value: Option<Value>, include: bool, side: Side) -> Self {
        Self {
            value,
            include,
            side,
        }
    }

    /// Unbounded endpoint for the given side.
    pub fn unbounded(side: Side) -> Self {
        Self::new(None, true, side)
    }

    /// Returns true if `self` sits strictly after `other` on the number
    /// line, counting inclusivity.
    ///
    /// An unbounded right endpoint is greater than everything; an
    /// unbounded left endpoint is less than everything. On a value tie
    /// the exclusive left bound is the greater (it starts later) and the
    /// inclusive right bound is the greater (it ends later). Incomparable
    /// values are treated as not greater, so an unknown comparison never
    /// tightens a bound.
    pub fn is_after(&self, other: &Endpoint) -> bool {
        let value = match &self.value {
            None => return self.side == Side::Right,
            Some(v) => v,
        };
        let other_value = match &other.value {
            None => return other.side == Side::Left,
            Some(v) => v,
        };

        match value.partial_cmp(other_value) {
            Some(std::cmp::Ordering::Equal) => match (self.side, other.side) {
                (Side::Left, Side::Left) => !self.include && other.include,
                (Side::Left, Side::Right) => !self.include,
                (Side::Right, Side::Right) => !other.include && self.include,
                (Side::Right, Side::Left) => false,
            },
            Some(ordering) => ordering.is_gt(),
            None => false,
        }
    }

    /// The tighter (greater) of two left endpoints.
    pub fn max(self, other: Endpoint) -> Endpoint {
        if other.is_after(&self) {
            other
        } else {
            self
        }
    }

    /// The tighter (lesser) of two right endpoints.
    pub fn min(self, other: Endpoint) -> Endpoint {
        if self.is_after(&other) {
            other
        } else {
            self
        }
    }
}
