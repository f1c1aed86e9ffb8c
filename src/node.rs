use std::sync::{Arc, Mutex};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::comparator::Comparator;

/// A subtree link: `None` is the empty tree, `Some` an owned, possibly-shared node.
///
/// Sharing is what makes the immutable structural operations cheap: cloning a
/// `Link` only bumps a reference count, never touches the pointee.
pub(crate) type Link<T> = Option<Arc<Node<T>>>;

/// A treap node: the stored item, its random priority, its two children and the
/// two augmented pointers used to prune interval queries.
///
/// `min_upper`/`max_upper` hold the items (not node references) with the smallest
/// and largest upper endpoint in the subtree rooted at this node: the contract
/// is the upper-extreme item itself, not a specific pointer into the subtree.
pub(crate) struct Node<T> {
    pub item: T,
    pub priority: u64,
    pub left: Link<T>,
    pub right: Link<T>,
    pub min_upper: T,
    pub max_upper: T,
}

impl<T: Clone> Node<T> {
    /// A freshly created, childless node: its own item is trivially both extremes.
    pub fn leaf(item: T, priority: u64) -> Self {
        let min_upper = item.clone();
        let max_upper = item.clone();
        Node {
            item,
            priority,
            left: None,
            right: None,
            min_upper,
            max_upper,
        }
    }

    /// A node-local, shallow copy: children are cloned as `Arc` pointers (cheap,
    /// no recursion). Used as the copy-on-write fallback in [`own_node`].
    fn shallow_copy(&self) -> Self {
        Node {
            item: self.item.clone(),
            priority: self.priority,
            left: self.left.clone(),
            right: self.right.clone(),
            min_upper: self.min_upper.clone(),
            max_upper: self.max_upper.clone(),
        }
    }
}

/// Takes ownership of the node behind `arc`, copying it only if it is shared.
///
/// This is the single mechanism by which every structural primitive (split,
/// join, insert, delete, union) gets both its mutable and its path-copying
/// flavour from the *same* recursive code: when a handle is the sole owner of a
/// node (`Arc::try_unwrap` succeeds), the node is reused in place; when the node
/// is also reachable from another snapshot, it is duplicated here — and only
/// here, one node at a time — before being rewritten. Entry points choose which
/// behaviour they get simply by how they obtain the initial `Link`: mutable
/// operations `take()` their own root (usually unique), immutable operations
/// `clone()` it first (always shared, at least with themselves).
pub(crate) fn own_node<T: Clone>(arc: Arc<Node<T>>) -> Node<T> {
    match Arc::try_unwrap(arc) {
        Ok(node) => node,
        Err(arc) => arc.shallow_copy(),
    }
}

/// Recomputes `min_upper`/`max_upper` from a node's own item and its immediate
/// children's augmented fields. `O(1)` per call; callers are responsible for
/// invoking this bottom-up after any change to `left` or `right`.
pub(crate) fn recompute_augmentation<T, C>(node: &mut Node<T>, cmp: &C)
where
    T: Clone,
    C: Comparator<T>,
{
    node.min_upper = node.item.clone();
    node.max_upper = node.item.clone();

    if let Some(left) = &node.left {
        if cmp.relate(&left.min_upper, &node.min_upper).rr < 0 {
            node.min_upper = left.min_upper.clone();
        }
        if cmp.relate(&left.max_upper, &node.max_upper).rr > 0 {
            node.max_upper = left.max_upper.clone();
        }
    }

    if let Some(right) = &node.right {
        if cmp.relate(&right.min_upper, &node.min_upper).rr < 0 {
            node.min_upper = right.min_upper.clone();
        }
        if cmp.relate(&right.max_upper, &node.max_upper).rr > 0 {
            node.max_upper = right.max_upper.clone();
        }
    }
}

/// A deep, fully independent copy of a subtree: every node is rebuilt fresh,
/// sharing nothing with the source. This backs the public, O(n) `clone()`
/// structural operation; it is deliberately distinct from cloning a `Link`
/// (an O(1) `Arc` bump used internally for structural sharing).
pub(crate) fn deep_copy<T: Clone>(link: &Link<T>) -> Link<T> {
    link.as_deref().map(|node| {
        Arc::new(Node {
            item: node.item.clone(),
            priority: node.priority,
            left: deep_copy(&node.left),
            right: deep_copy(&node.right),
            min_upper: node.min_upper.clone(),
            max_upper: node.max_upper.clone(),
        })
    })
}

/// A source of random treap priorities, drawing at least 32 random bits per
/// value; stored behind a mutex so that tree handles remain `Send + Sync`
/// even though generating a priority mutates RNG state.
pub(crate) struct PriorityRng(Mutex<SmallRng>);

impl PriorityRng {
    pub fn from_entropy() -> Self {
        PriorityRng(Mutex::new(SmallRng::from_os_rng()))
    }

    pub fn from_seed(seed: u64) -> Self {
        PriorityRng(Mutex::new(SmallRng::seed_from_u64(seed)))
    }

    /// Draws a fresh priority. Locking is uncontended in the recommended
    /// single-writer discipline; it only matters when multiple threads mutate
    /// the same handle concurrently, which callers must otherwise synchronize.
    pub fn next(&self) -> u64 {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).random()
    }
}

impl Clone for PriorityRng {
    fn clone(&self) -> Self {
        let guard = self.0.lock().unwrap_or_else(|e| e.into_inner());
        PriorityRng(Mutex::new(guard.clone()))
    }
}

impl std::fmt::Debug for PriorityRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PriorityRng(..)")
    }
}
