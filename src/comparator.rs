use std::cmp::Ordering;

/// The four signed comparisons between a pair of intervals that every higher-level
/// predicate (equality, cover, intersection, precedence) is derived from.
///
/// `ll` compares the lower bounds, `rr` the upper bounds, `lr` the first interval's
/// lower bound against the second's upper bound and `rl` the reverse. Each field is
/// one of `-1`, `0` or `1`, matching the sign of the underlying comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Relation {
    /// Sign of `lower(a) - lower(b)`.
    pub ll: i8,
    /// Sign of `upper(a) - upper(b)`.
    pub rr: i8,
    /// Sign of `lower(a) - upper(b)`.
    pub lr: i8,
    /// Sign of `upper(a) - lower(b)`.
    pub rl: i8,
}

impl Relation {
    /// Builds a relation from four orderings, taken in `(ll, rr, lr, rl)` order.
    pub fn from_orderings(ll: Ordering, rr: Ordering, lr: Ordering, rl: Ordering) -> Self {
        Relation {
            ll: ll as i8,
            rr: rr as i8,
            lr: lr as i8,
            rl: rl as i8,
        }
    }
}

/// A caller-supplied relation over element type `T`.
///
/// This is the only thing the index knows about `T`: every structural and query
/// operation is expressed in terms of [`Comparator::relate`] and the predicates
/// derived from it below. Implementations are typically zero-sized and `Copy`.
pub trait Comparator<T>: Clone {
    /// Relates `a` to `b`, producing the four Allen-relation signs.
    fn relate(&self, a: &T, b: &T) -> Relation;

    /// Total order used to place items in the tree: lower bound ascending, with
    /// the superset sorting before a same-lower subset.
    fn cmp_bst(&self, a: &T, b: &T) -> i8 {
        let rel = self.relate(a, b);
        if rel.ll != 0 {
            rel.ll
        } else {
            -rel.rr
        }
    }

    /// `true` when `a` and `b` denote the same interval (`ll == 0 && rr == 0`).
    fn equal(&self, a: &T, b: &T) -> bool {
        let rel = self.relate(a, b);
        rel.ll == 0 && rel.rr == 0
    }

    /// `true` when `a` covers `b`, i.e. `a.lower <= b.lower && a.upper >= b.upper`.
    fn covers(&self, a: &T, b: &T) -> bool {
        let rel = self.relate(a, b);
        rel.ll <= 0 && rel.rr >= 0
    }

    /// `true` when `a` and `b` overlap: neither fully before nor fully after.
    fn intersects(&self, a: &T, b: &T) -> bool {
        let rel = self.relate(a, b);
        let fully_before = rel.ll == -1 && rel.rr == -1 && rel.lr == -1 && rel.rl == -1;
        let fully_after = rel.ll == 1 && rel.rr == 1 && rel.lr == 1 && rel.rl == 1;
        !fully_before && !fully_after
    }
}

impl<T, C: Comparator<T> + ?Sized> Comparator<T> for &C {
    fn relate(&self, a: &T, b: &T) -> Relation {
        (**self).relate(a, b)
    }
}

/// Accessors an interval type provides so that [`EndpointComparator`] can derive
/// [`Relation`]s from plain `Ord` endpoints, without the caller writing a
/// comparator by hand.
pub trait Bounds {
    /// The endpoint type, e.g. an integer, timestamp or IP address.
    type Endpoint: Ord;

    /// The interval's lower (inclusive) endpoint.
    fn lower(&self) -> &Self::Endpoint;

    /// The interval's upper (inclusive) endpoint.
    fn upper(&self) -> &Self::Endpoint;
}

/// The standard comparator for interval-like types: derives [`Relation`] purely
/// from [`Bounds::lower`]/[`Bounds::upper`] via `Ord`.
///
/// This is the comparator used by the [`crate::Tree`] convenience constructors
/// for the common case of `[lo, hi]` pairs ordered by the endpoint's own `Ord`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointComparator;

impl<T: Bounds> Comparator<T> for EndpointComparator {
    fn relate(&self, a: &T, b: &T) -> Relation {
        Relation::from_orderings(
            a.lower().cmp(b.lower()),
            a.upper().cmp(b.upper()),
            a.lower().cmp(b.upper()),
            a.upper().cmp(b.lower()),
        )
    }
}

/// Adapts a plain function or closure into a [`Comparator`].
///
/// Useful when the element type does not implement [`Bounds`], or when the
/// relation is not a simple endpoint comparison (e.g. circular or fuzzy
/// intervals).
#[derive(Clone, Copy)]
pub struct FnComparator<F>(pub F);

impl<T, F> Comparator<T> for FnComparator<F>
where
    F: Fn(&T, &T) -> Relation + Clone,
{
    fn relate(&self, a: &T, b: &T) -> Relation {
        (self.0)(a, b)
    }
}

/// Lets tests across the crate build trees of plain `(lo, hi)` pairs directly
/// with [`EndpointComparator`] instead of a one-off wrapper type per module.
#[cfg(test)]
impl Bounds for (i64, i64) {
    type Endpoint = i64;

    fn lower(&self) -> &i64 {
        &self.0
    }

    fn upper(&self) -> &i64 {
        &self.1
    }
}
