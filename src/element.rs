//! Stream elements
//!
//! An [`Element`] is one immutable record of the input stream: either a
//! numeric vector (kernel-based objectives) or a token bag with a scalar
//! weight (coverage objectives). Elements are identified by their zero-based
//! arrival position, which doubles as the tie-break order everywhere a
//! selector must choose between equal candidates.
//!
//! The only mutable field is `fdelta`, the marginal gain last computed for
//! the element by a selector that re-orders its summary. It is a sort key,
//! not part of the objective.

use std::fmt;

/// Zero-based position of an element in the input stream.
///
/// Ids are globally unique per run and strictly increasing in arrival
/// order; the streaming selectors rely on `id` comparisons to recover
/// "arrived earlier than" relations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub usize);

impl ElementId {
    /// Access the underlying index.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two element flavors the harness understands.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// A point in `R^dim`.
    Numeric {
        /// Ordered coordinates; `coords.len()` is the dimension.
        coords: Vec<f64>,
    },
    /// A bag of tokens with one scalar weight (e.g. a tweet with its
    /// retweet count). Duplicate tokens across records are pooled by the
    /// coverage objective.
    Tokens {
        /// Non-negative record weight.
        weight: f64,
        /// Tokens carried by this record (duplicates allowed).
        words: Vec<String>,
    },
}

/// One input record.
#[derive(Clone, Debug)]
pub struct Element {
    /// Stream position, assigned by the parser/generator.
    pub id: ElementId,
    /// Numeric or token payload.
    pub payload: Payload,
    /// Marginal gain recorded when the element was last peeked by a
    /// reordering selector. Meaningless outside those selectors.
    pub fdelta: f64,
}

impl Element {
    /// Build a numeric-vector element.
    pub fn numeric(id: usize, coords: Vec<f64>) -> Self {
        Self {
            id: ElementId(id),
            payload: Payload::Numeric { coords },
            fdelta: 0.0,
        }
    }

    /// Build a token-bag element.
    pub fn tokens(id: usize, weight: f64, words: Vec<String>) -> Self {
        debug_assert!(weight >= 0.0, "record weight must be non-negative");
        Self {
            id: ElementId(id),
            payload: Payload::Tokens { weight, words },
            fdelta: 0.0,
        }
    }

    /// Payload dimension: coordinate count for numeric elements, token
    /// count for bags.
    #[inline]
    pub fn dim(&self) -> usize {
        match &self.payload {
            Payload::Numeric { coords } => coords.len(),
            Payload::Tokens { words, .. } => words.len(),
        }
    }

    /// Coordinates of a numeric element; empty for token bags.
    #[inline]
    pub fn coords(&self) -> &[f64] {
        match &self.payload {
            Payload::Numeric { coords } => coords,
            Payload::Tokens { .. } => &[],
        }
    }

    /// Tokens of a bag element; empty for numeric vectors.
    #[inline]
    pub fn words(&self) -> &[String] {
        match &self.payload {
            Payload::Tokens { words, .. } => words,
            Payload::Numeric { .. } => &[],
        }
    }

    /// Record weight of a bag element; 0 for numeric vectors.
    #[inline]
    pub fn weight(&self) -> f64 {
        match &self.payload {
            Payload::Tokens { weight, .. } => *weight,
            Payload::Numeric { .. } => 0.0,
        }
    }

    /// Squared Euclidean distance between two numeric elements.
    ///
    /// Both elements must be numeric and of equal dimension; the kernel
    /// oracle guarantees this by construction (one dataset, one dimension).
    pub fn distance_sq(&self, other: &Element) -> f64 {
        let (a, b) = (self.coords(), other.coords());
        debug_assert_eq!(a.len(), b.len(), "mixed dimensions in one stream");
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| {
                let d = x - y;
                d * d
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_squared_euclidean() {
        let p = Element::numeric(0, vec![0.0, 0.0]);
        let q = Element::numeric(1, vec![3.0, 4.0]);
        assert_eq!(p.distance_sq(&q), 25.0);
        assert_eq!(q.distance_sq(&q), 0.0);
    }

    #[test]
    fn payload_accessors_are_total() {
        let v = Element::numeric(0, vec![1.0]);
        let t = Element::tokens(1, 2.0, vec!["a".into(), "a".into()]);
        assert_eq!(v.dim(), 1);
        assert_eq!(t.dim(), 2);
        assert!(v.words().is_empty());
        assert_eq!(v.weight(), 0.0);
        assert!(t.coords().is_empty());
        assert_eq!(t.weight(), 2.0);
    }

    #[test]
    fn ids_order_by_arrival() {
        assert!(ElementId(3) < ElementId(7));
        assert_eq!(ElementId(5).as_usize(), 5);
    }
}
