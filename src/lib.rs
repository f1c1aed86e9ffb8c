#![forbid(unsafe_code)]
#![deny(missing_docs, missing_debug_implementations)]

//! An augmented, randomized treap over one-dimensional intervals.
//!
//! [`Tree`] indexes values of a caller-chosen element type `T` by a
//! [`Comparator`] that derives the lower/upper endpoint relation between any
//! two elements. The tree itself never looks at concrete endpoints: every
//! structural and query operation goes through [`Comparator::relate`] and the
//! predicates built on top of it, so `T` can be a plain `(i64, i64)` pair, a
//! struct carrying satellite data alongside its span, or anything else for
//! which endpoints make sense.
//!
//! Balancing is randomized (a treap: a BST ordered by key, heap-ordered by a
//! random priority), and every node carries two augmented fields — the
//! subtree's minimum- and maximum-upper-bound items — that let queries prune
//! without visiting every node. Structural operations come in two flavours:
//! an immutable one that returns a new [`Tree`] while leaving the receiver's
//! snapshot observably unchanged (path copying the touched nodes only), and a
//! `_mutable` one that rewrites the receiver in place. Both share the exact
//! same recursive algorithms; which behaviour you get falls out of whether
//! the root handle passed down is uniquely owned.

mod comparator;
mod node;
mod ops;
#[cfg(feature = "rayon")]
mod parallel;
mod query;
mod set_query;
mod split_join;
mod traverse;

pub use comparator::{Bounds, Comparator, EndpointComparator, FnComparator, Relation};

use std::fmt;

use node::{deep_copy, Link, PriorityRng};

/// An augmented randomized-treap interval index over element type `T`,
/// ordered and related via `C`.
///
/// Defaults to [`EndpointComparator`], so `Tree<T>` works directly for any `T`
/// implementing [`Bounds`]; supply a different [`Comparator`] for element
/// types with a custom or non-endpoint relation.
pub struct Tree<T, C = EndpointComparator> {
    root: Link<T>,
    cmp: C,
    len: usize,
    rng: PriorityRng,
}

impl<T, C> Tree<T, C>
where
    C: Comparator<T>,
{
    /// An empty tree using `cmp` to relate elements.
    pub fn new(cmp: C) -> Self {
        Tree {
            root: None,
            cmp,
            len: 0,
            rng: PriorityRng::from_entropy(),
        }
    }

    /// An empty tree using `cmp`, drawing priorities from a reproducible seed
    /// instead of the operating system's entropy source.
    ///
    /// Determinism of the resulting tree *shape* is not guaranteed, only that
    /// two trees built from the same seed and the same sequence of insertions
    /// draw the same priorities.
    pub fn with_seed(cmp: C, seed: u64) -> Self {
        Tree {
            root: None,
            cmp,
            len: 0,
            rng: PriorityRng::from_seed(seed),
        }
    }

    /// The number of stored items.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if the tree holds no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T, C> Tree<T, C>
where
    T: Clone,
    C: Comparator<T>,
{
    /// Builds a tree by inserting `items` sequentially via [`Self::insert_mutable`].
    pub fn build<I>(cmp: C, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut tree = Self::new(cmp);
        tree.insert_mutable(items);
        tree
    }

    /// Builds a tree from `items`, fanning construction out across up to
    /// `workers` threads of the current rayon thread pool.
    ///
    /// Below a size threshold, or with `workers <= 1`, falls back to
    /// sequential construction. The resulting tree has the same size and
    /// in-order sequence as [`Self::build`] on the same items, though its
    /// shape and the priorities drawn will generally differ.
    #[cfg(feature = "rayon")]
    pub fn new_concurrent<I>(workers: usize, cmp: C, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Send,
        C: Sync,
    {
        let items: Vec<T> = items.into_iter().collect();
        let submitted = items.len();
        log::debug!("building concurrent tree: {submitted} items, {workers} workers");
        let rng = PriorityRng::from_entropy();
        let (root, dups) = parallel::build_concurrent(workers, items, &cmp, &rng);
        Tree {
            root,
            cmp,
            len: submitted - dups,
            rng,
        }
    }

    /// Inserts `items`, returning a new tree; the receiver's snapshot is left
    /// unchanged.
    ///
    /// An inserted item that is already present (per [`Comparator::equal`])
    /// replaces the existing one; the new item's priority governs the
    /// replacement's place in the tree.
    pub fn insert<I>(&self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut root = self.root.clone();
        let mut len = self.len;
        for item in items {
            let priority = self.rng.next();
            let (new_root, was_new) = ops::insert_into(root, item, priority, &self.cmp);
            root = new_root;
            len += was_new as usize;
        }
        Tree {
            root,
            cmp: self.cmp.clone(),
            len,
            rng: self.rng.clone(),
        }
    }

    /// Inserts `items` in place.
    pub fn insert_mutable<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            let priority = self.rng.next();
            let (root, was_new) = ops::insert_into(self.root.take(), item, priority, &self.cmp);
            self.root = root;
            self.len += was_new as usize;
        }
    }

    /// Deletes `item`, returning the new tree and whether it was present; the
    /// receiver's snapshot is left unchanged.
    pub fn delete(&self, item: &T) -> (Self, bool) {
        let (root, existed) = ops::delete_from(self.root.clone(), item, &self.cmp);
        let len = self.len - existed as usize;
        (
            Tree {
                root,
                cmp: self.cmp.clone(),
                len,
                rng: self.rng.clone(),
            },
            existed,
        )
    }

    /// Deletes `item` in place, returning whether it was present.
    pub fn delete_mutable(&mut self, item: &T) -> bool {
        let (root, existed) = ops::delete_from(self.root.take(), item, &self.cmp);
        self.root = root;
        self.len -= existed as usize;
        existed
    }

    /// Merges `other` into a new tree; both `self` and `other` are left
    /// unchanged.
    ///
    /// On a duplicate key, `self`'s item is kept unless `overwrite` is set.
    pub fn union(&self, other: &Self, overwrite: bool) -> Self {
        let (root, dups) =
            ops::union(self.root.clone(), other.root.clone(), overwrite, &self.cmp);
        Tree {
            root,
            cmp: self.cmp.clone(),
            len: self.len + other.len - dups,
            rng: self.rng.clone(),
        }
    }

    /// Merges `other` into `self` in place; `other` is left unchanged.
    pub fn union_mutable(&mut self, other: &Self, overwrite: bool) {
        let (root, dups) = ops::union(self.root.take(), other.root.clone(), overwrite, &self.cmp);
        self.root = root;
        self.len = self.len + other.len - dups;
    }

    /// The stored item equal to `probe`, if any.
    pub fn find(&self, probe: &T) -> Option<T> {
        query::find(&self.root, probe, &self.cmp).cloned()
    }

    /// The most-specific (smallest) stored interval covering `probe`, also
    /// known as longest-prefix-match.
    pub fn cover_lcp(&self, probe: &T) -> Option<T> {
        query::cover_lcp(&self.root, probe, &self.cmp).cloned()
    }

    /// The least-specific (largest) stored interval covering `probe`.
    pub fn cover_scp(&self, probe: &T) -> Option<T> {
        query::cover_scp(&self.root, probe, &self.cmp).cloned()
    }

    /// Whether any stored interval overlaps `probe`.
    pub fn intersects(&self, probe: &T) -> bool {
        query::intersects(&self.root, probe, &self.cmp)
    }

    /// All stored intervals covering `probe`, in ascending BST order (the
    /// first is the least-specific cover, the last the most-specific).
    pub fn covers(&self, probe: &T) -> Vec<T> {
        set_query::covers(&self.root, probe, &self.cmp)
    }

    /// All stored intervals contained within `probe`, in ascending BST order.
    pub fn covered_by(&self, probe: &T) -> Vec<T> {
        set_query::covered_by(&self.root, probe, &self.cmp)
    }

    /// All stored intervals overlapping `probe`, in ascending BST order.
    pub fn intersections(&self, probe: &T) -> Vec<T> {
        set_query::intersections(&self.root, probe, &self.cmp)
    }

    /// All stored intervals strictly before `probe`, in ascending BST order.
    pub fn precedes(&self, probe: &T) -> Vec<T> {
        set_query::precedes(&self.root, probe, &self.cmp)
    }

    /// All stored intervals strictly after `probe`, in ascending BST order.
    pub fn preceded_by(&self, probe: &T) -> Vec<T> {
        set_query::preceded_by(&self.root, probe, &self.cmp)
    }

    /// The BST-leftmost stored item, or `None` if the tree is empty.
    ///
    /// (Returning `Option<T>` rather than the zero value of `T` for an empty
    /// tree keeps this consistent with the rest of the query surface —
    /// `find`, `cover_lcp`, `cover_scp` — without imposing a `Default` bound
    /// this crate does not otherwise need.)
    pub fn min(&self) -> Option<T> {
        query::min(&self.root).cloned()
    }

    /// The BST-rightmost stored item, or `None` if the tree is empty.
    pub fn max(&self) -> Option<T> {
        query::max(&self.root).cloned()
    }

    /// Visits every item with a key in the closed range between `start` and
    /// `stop`, ascending if `start` is BST-less-or-equal to `stop`,
    /// descending otherwise. Stops as soon as `f` returns `false`.
    pub fn visit(&self, start: &T, stop: &T, mut f: impl FnMut(&T) -> bool) {
        traverse::visit(&self.root, start, stop, &self.cmp, &mut f);
    }
}

impl<T, C> Clone for Tree<T, C>
where
    T: Clone,
    C: Clone,
{
    /// A deep copy: every node is rebuilt fresh, sharing nothing with `self`.
    ///
    /// Distinct from the cheap, `Arc`-based structural sharing used
    /// internally by [`Self::insert`]/[`Self::delete`]/[`Self::union`] to keep
    /// prior snapshots alive; here, every single node is duplicated.
    fn clone(&self) -> Self {
        Tree {
            root: deep_copy(&self.root),
            cmp: self.cmp.clone(),
            len: self.len,
            rng: self.rng.clone(),
        }
    }
}

impl<T, C> Default for Tree<T, C>
where
    C: Comparator<T> + Default,
{
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<T, C> fmt::Debug for Tree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree").field("len", &self.len).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Iv(i64, i64);

    impl Bounds for Iv {
        type Endpoint = i64;

        fn lower(&self) -> &i64 {
            &self.0
        }

        fn upper(&self) -> &i64 {
            &self.1
        }
    }

    fn fixture() -> Tree<Iv> {
        let items = [
            Iv(0, 6),
            Iv(0, 5),
            Iv(1, 8),
            Iv(1, 7),
            Iv(1, 5),
            Iv(1, 4),
            Iv(2, 8),
            Iv(2, 7),
            Iv(4, 8),
            Iv(6, 7),
            Iv(7, 9),
        ];
        Tree::build(EndpointComparator, items)
    }

    #[test]
    fn empty_tree_queries_return_empty() {
        let tree: Tree<Iv> = Tree::new(EndpointComparator);
        assert!(tree.is_empty());
        assert_eq!(tree.find(&Iv(0, 1)), None);
        assert_eq!(tree.cover_lcp(&Iv(0, 1)), None);
        assert_eq!(tree.cover_scp(&Iv(0, 1)), None);
        assert!(!tree.intersects(&Iv(0, 1)));
        assert_eq!(tree.covers(&Iv(0, 1)), Vec::new());
        assert_eq!(tree.min(), None);
        assert_eq!(tree.max(), None);
    }

    #[test]
    fn single_element_tree() {
        let tree = Tree::build(EndpointComparator, [Iv(2, 5)]);
        assert_eq!(tree.find(&Iv(2, 5)), Some(Iv(2, 5)));
        assert_eq!(tree.cover_lcp(&Iv(2, 5)), Some(Iv(2, 5)));
        assert_eq!(tree.cover_scp(&Iv(2, 5)), Some(Iv(2, 5)));
        assert_eq!(tree.intersections(&Iv(2, 5)), vec![Iv(2, 5)]);
    }

    #[test]
    fn duplicate_keys_collapse_to_one() {
        let mut items = Vec::new();
        items.push(Iv(0, 100));
        items.extend(std::iter::repeat(Iv(41, 102)).take(7));
        items.extend(std::iter::repeat(Iv(42, 67)).take(8));
        items.push(Iv(48, 50));
        items.extend(std::iter::repeat(Iv(3, 13)).take(6));

        let tree = Tree::build(EndpointComparator, items);
        assert_eq!(tree.len(), 5);

        let mut order = Vec::new();
        tree.visit(&Iv(i64::MIN, i64::MIN), &Iv(i64::MAX, i64::MAX), |item| {
            order.push(*item);
            true
        });
        assert_eq!(
            order,
            vec![Iv(0, 100), Iv(3, 13), Iv(41, 102), Iv(42, 67), Iv(48, 50)]
        );
    }

    #[test]
    fn snapshot_insert_leaves_prior_handle_unchanged() {
        let tree = fixture();
        let tree2 = tree.insert([Iv(111, 666)]);

        assert_eq!(tree.len(), 11);
        assert_eq!(tree2.len(), 12);
        assert_eq!(tree2.find(&Iv(111, 666)), Some(Iv(111, 666)));
        assert_eq!(tree.find(&Iv(111, 666)), None);
    }

    #[test]
    fn insert_delete_round_trip_preserves_membership() {
        let tree = fixture();
        let probe = Iv(123, 456);

        let with_probe = tree.insert([probe]);
        let (back, existed) = with_probe.delete(&probe);
        assert!(existed);
        assert_eq!(back.len(), tree.len());

        let mut before = Vec::new();
        tree.visit(&Iv(i64::MIN, i64::MIN), &Iv(i64::MAX, i64::MAX), |item| {
            before.push(*item);
            true
        });
        let mut after = Vec::new();
        back.visit(&Iv(i64::MIN, i64::MIN), &Iv(i64::MAX, i64::MAX), |item| {
            after.push(*item);
            true
        });
        assert_eq!(before, after);
    }

    #[test]
    fn delete_of_absent_item_is_a_no_op() {
        let tree = fixture();
        let (after, existed) = tree.delete(&Iv(999, 999));
        assert!(!existed);
        assert_eq!(after.len(), tree.len());
    }

    #[test]
    fn union_with_empty_is_identity() {
        let tree = fixture();
        let empty: Tree<Iv> = Tree::new(EndpointComparator);

        let merged = tree.union(&empty, false);
        assert_eq!(merged.len(), tree.len());

        let merged = empty.union(&tree, false);
        assert_eq!(merged.len(), tree.len());
    }

    #[test]
    fn clone_preserves_size_and_order() {
        let tree = fixture();
        let cloned = tree.clone();
        assert_eq!(cloned.len(), tree.len());

        let mut a = Vec::new();
        tree.visit(&Iv(i64::MIN, i64::MIN), &Iv(i64::MAX, i64::MAX), |item| {
            a.push(*item);
            true
        });
        let mut b = Vec::new();
        cloned.visit(&Iv(i64::MIN, i64::MIN), &Iv(i64::MAX, i64::MAX), |item| {
            b.push(*item);
            true
        });
        assert_eq!(a, b);
    }

    #[test]
    fn cover_lcp_and_cover_scp_are_simultaneously_some_or_none() {
        let tree = fixture();
        for probe in [Iv(0, 5), Iv(5, 5), Iv(19, 55), Iv(8, 9), Iv(100, 200)] {
            assert_eq!(
                tree.cover_lcp(&probe).is_some(),
                tree.cover_scp(&probe).is_some(),
                "probe {probe:?}"
            );
        }
    }

    #[test]
    fn fn_comparator_adapts_a_closure() {
        let cmp = FnComparator(|a: &Iv, b: &Iv| {
            Relation::from_orderings(a.0.cmp(&b.0), a.1.cmp(&b.1), a.0.cmp(&b.1), a.1.cmp(&b.0))
        });
        let tree = Tree::build(cmp, [Iv(0, 6), Iv(1, 4)]);
        assert_eq!(tree.find(&Iv(1, 4)), Some(Iv(1, 4)));
    }
}
