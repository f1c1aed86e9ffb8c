use std::sync::Arc;

use crate::comparator::Comparator;
use crate::node::{own_node, recompute_augmentation, Link, Node};

/// Splits the treap rooted at `link` by `key` into `(less, equal, greater)`,
/// where `equal` holds at most one node (the one whose item is BST-equal to
/// `key`).
///
/// Whether this path-copies or mutates in place falls entirely out of how the
/// caller obtained `link` (see [`own_node`]): passing an `Arc::clone`d root
/// yields a persistent split that leaves every other handle untouched; passing
/// an owned, uniquely-held root mutates it in place. The algorithm itself never
/// branches on a "mutable" flag.
pub(crate) fn split<T, C>(link: Link<T>, key: &T, cmp: &C) -> (Link<T>, Link<T>, Link<T>)
where
    T: Clone,
    C: Comparator<T>,
{
    let Some(arc) = link else {
        return (None, None, None);
    };

    let node = own_node(arc);
    let Node {
        item,
        priority,
        left,
        right,
        ..
    } = node;

    match cmp.cmp_bst(&item, key) {
        0 => {
            // `item`'s own subtrees are already entirely less-than / greater-than
            // `key` by the BST invariant, so they become the two halves directly.
            let mid = Arc::new(Node::leaf(item, priority));
            (left, Some(mid), right)
        }
        ord if ord < 0 => {
            // `item` belongs in the lesser half; only its right child can still
            // straddle `key`.
            let (rl, mid, gt) = split(right, key, cmp);
            let placeholder = item.clone();
            let mut node = Node {
                item,
                priority,
                left,
                right: rl,
                min_upper: placeholder.clone(),
                max_upper: placeholder,
            };
            recompute_augmentation(&mut node, cmp);
            (Some(Arc::new(node)), mid, gt)
        }
        _ => {
            let (lt, mid, lr) = split(left, key, cmp);
            let placeholder = item.clone();
            let mut node = Node {
                item,
                priority,
                left: lr,
                right,
                min_upper: placeholder.clone(),
                max_upper: placeholder,
            };
            recompute_augmentation(&mut node, cmp);
            (lt, mid, Some(Arc::new(node)))
        }
    }
}

/// Merges two treaps where every item of `left` is BST-less than every item of
/// `right`, preserving both the BST order and the max-heap order on priority.
///
/// Same path-copy/mutate duality as [`split`]: it is determined purely by
/// whether the `Arc`s passed in are uniquely held.
pub(crate) fn join<T, C>(left: Link<T>, right: Link<T>, cmp: &C) -> Link<T>
where
    T: Clone,
    C: Comparator<T>,
{
    match (left, right) {
        (None, right) => right,
        (left, None) => left,
        (Some(l_arc), Some(r_arc)) => {
            let l_node = own_node(l_arc);
            let r_node = own_node(r_arc);

            if l_node.priority >= r_node.priority {
                let mut l_node = l_node;
                l_node.right = join(l_node.right.take(), Some(Arc::new(r_node)), cmp);
                recompute_augmentation(&mut l_node, cmp);
                Some(Arc::new(l_node))
            } else {
                let mut r_node = r_node;
                r_node.left = join(Some(Arc::new(l_node)), r_node.left.take(), cmp);
                recompute_augmentation(&mut r_node, cmp);
                Some(Arc::new(r_node))
            }
        }
    }
}
