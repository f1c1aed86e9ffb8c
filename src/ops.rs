use std::sync::Arc;

use crate::comparator::Comparator;
use crate::node::{own_node, recompute_augmentation, Link, Node};
use crate::split_join::{join, split};

/// Inserts `item` (freshly created with `priority`) into the treap rooted at
/// `link`, returning the new root and whether the item was new (`true`) or
/// replaced an existing, BST-equal item (`false`).
///
/// An item that already exists in the tree is always removed and reinserted
/// with the *new* priority (via [`join`]) rather than being patched in place:
/// this guarantees the heap invariant holds
/// regardless of whether the new priority is higher or lower than the old one,
/// which a pure "descend, then rebuild at the threshold" insert cannot
/// guarantee for the lower case.
pub(crate) fn insert_into<T, C>(link: Link<T>, item: T, priority: u64, cmp: &C) -> (Link<T>, bool)
where
    T: Clone,
    C: Comparator<T>,
{
    let Some(arc) = link else {
        log::trace!("insert: new leaf");
        return (Some(Arc::new(Node::leaf(item, priority))), true);
    };

    let node = own_node(arc);

    if cmp.equal(&item, &node.item) {
        let merged = join(node.left, node.right, cmp);
        let (new_root, _) = insert_into(merged, item, priority, cmp);
        return (new_root, false);
    }

    if priority >= node.priority {
        // `item` does not equal this node (checked above), but it may still
        // equal some descendant; `split` searches the whole subtree by key, so
        // `mid` catches that case too and we simply let the new priority win.
        let whole = Some(Arc::new(node));
        let (lt, mid, gt) = split(whole, &item, cmp);
        let was_new = mid.is_none();
        let mut new_node = Node::leaf(item, priority);
        new_node.left = lt;
        new_node.right = gt;
        recompute_augmentation(&mut new_node, cmp);
        (Some(Arc::new(new_node)), was_new)
    } else {
        let mut node = node;
        let was_new = if cmp.cmp_bst(&item, &node.item) < 0 {
            let (new_left, was_new) = insert_into(node.left.take(), item, priority, cmp);
            node.left = new_left;
            was_new
        } else {
            let (new_right, was_new) = insert_into(node.right.take(), item, priority, cmp);
            node.right = new_right;
            was_new
        };
        recompute_augmentation(&mut node, cmp);
        (Some(Arc::new(node)), was_new)
    }
}

/// Splits out `item` and rejoins the remainder, reporting whether it was
/// present.
pub(crate) fn delete_from<T, C>(link: Link<T>, item: &T, cmp: &C) -> (Link<T>, bool)
where
    T: Clone,
    C: Comparator<T>,
{
    let (lt, mid, gt) = split(link, item, cmp);
    let existed = mid.is_some();
    (join(lt, gt, cmp), existed)
}

/// Classic randomized treap union: the higher-priority root governs, the other
/// treap is split by its item to isolate any duplicate, and the two sides
/// recurse independently.
///
/// `overwrite` controls which item wins on a duplicate key: `true` keeps the
/// value from `b`, `false` keeps `a`. Swapping which side is "the governing
/// root" inverts which one is "the other", so the flag is toggled on every
/// swap to keep that meaning stable relative to the caller's original `a`/`b`.
/// Returns the merged root and the number of duplicate keys collapsed, so
/// callers can maintain an accurate `len`.
pub(crate) fn union<T, C>(a: Link<T>, b: Link<T>, overwrite: bool, cmp: &C) -> (Link<T>, usize)
where
    T: Clone,
    C: Comparator<T>,
{
    match (a, b) {
        (None, other) => (other, 0),
        (other, None) => (other, 0),
        (Some(a_arc), Some(b_arc)) => {
            let a_node = own_node(a_arc);
            let b_node = own_node(b_arc);

            let (mut p, q, overwrite) = if a_node.priority >= b_node.priority {
                (a_node, Some(Arc::new(b_node)), overwrite)
            } else {
                (b_node, Some(Arc::new(a_node)), !overwrite)
            };

            let (q_left, q_mid, q_right) = split(q, &p.item, cmp);
            let mut dups = 0;
            if let Some(dup) = q_mid {
                if overwrite {
                    p.item = own_node(dup).item;
                }
                dups += 1;
            }

            let (new_left, dups_left) = union(p.left.take(), q_left, overwrite, cmp);
            let (new_right, dups_right) = union(p.right.take(), q_right, overwrite, cmp);
            p.left = new_left;
            p.right = new_right;
            recompute_augmentation(&mut p, cmp);

            (Some(Arc::new(p)), dups + dups_left + dups_right)
        }
    }
}
