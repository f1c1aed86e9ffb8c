use crate::comparator::Comparator;
use crate::node::{Link, Node};

/// Descends by BST order to the item equal to `probe`, if any.
pub(crate) fn find<'a, T, C>(link: &'a Link<T>, probe: &T, cmp: &C) -> Option<&'a T>
where
    C: Comparator<T>,
{
    let mut cur = link.as_deref();
    while let Some(node) = cur {
        match cmp.cmp_bst(probe, &node.item) {
            0 => return Some(&node.item),
            ord if ord < 0 => cur = node.left.as_deref(),
            _ => cur = node.right.as_deref(),
        }
    }
    None
}

/// The most-specific cover of `probe`: the last element of `covers(probe)` in
/// BST-ascending order.
///
/// Within any subtree, BST order puts the left child's candidates before the
/// node before the right child's candidates; since covers are ranked by that
/// same order, the most specific cover of this subtree is whichever of
/// "the right subtree's most specific cover", "this node" or "the left
/// subtree's most specific cover" is found first, tried in that order. The
/// `max_upper` augmentation prunes subtrees that cannot possibly reach
/// `probe`'s upper bound at all.
pub(crate) fn cover_lcp<'a, T, C>(link: &'a Link<T>, probe: &T, cmp: &C) -> Option<&'a T>
where
    C: Comparator<T>,
{
    let node = link.as_deref()?;

    if cmp.relate(&node.max_upper, probe).rr < 0 {
        return None;
    }

    if let Some(found) = cover_lcp(&node.right, probe, cmp) {
        return Some(found);
    }

    if cmp.covers(&node.item, probe) {
        return Some(&node.item);
    }

    cover_lcp(&node.left, probe, cmp)
}

/// The least-specific cover of `probe`: the first element of `covers(probe)`.
///
/// Mirror image of [`cover_lcp`]: try the left subtree, then this node, then
/// the right subtree.
pub(crate) fn cover_scp<'a, T, C>(link: &'a Link<T>, probe: &T, cmp: &C) -> Option<&'a T>
where
    C: Comparator<T>,
{
    let node = link.as_deref()?;

    if cmp.relate(&node.max_upper, probe).rr < 0 {
        return None;
    }

    if let Some(found) = cover_scp(&node.left, probe, cmp) {
        return Some(found);
    }

    if cmp.covers(&node.item, probe) {
        return Some(&node.item);
    }

    cover_scp(&node.right, probe, cmp)
}

/// Existence of any stored interval overlapping `probe`, without allocating.
///
/// An augmented interval-tree walk: `go_left`/`go_right` decide which
/// children can possibly still intersect `probe`, pruned by `max_upper` and by
/// `probe`'s own bounds, mirroring the classic CLRS augmented search.
pub(crate) fn intersects<T, C>(link: &Link<T>, probe: &T, cmp: &C) -> bool
where
    C: Comparator<T>,
{
    let mut cur = link.as_deref();

    while let Some(node) = cur {
        if cmp.relate(&node.max_upper, probe).rl < 0 {
            // Even the largest upper bound in this subtree ends before
            // `probe` starts: nothing here can overlap.
            return false;
        }

        let go_left = matches!(&node.left, Some(left) if cmp.relate(&left.max_upper, probe).rl >= 0);

        if cmp.relate(&node.item, probe).lr > 0 {
            // This node (and, by BST order, everything to its right) starts
            // after `probe` ends.
            return go_left && intersects(&node.left, probe, cmp);
        }

        if cmp.intersects(&node.item, probe) {
            return true;
        }

        if go_left && intersects(&node.left, probe, cmp) {
            return true;
        }

        cur = node.right.as_deref();
    }

    false
}

pub(crate) fn min<T>(link: &Link<T>) -> Option<&T> {
    let mut cur = link.as_deref()?;
    while let Some(left) = cur.left.as_deref() {
        cur = left;
    }
    Some(&cur.item)
}

pub(crate) fn max<T>(link: &Link<T>) -> Option<&T> {
    let mut cur = link.as_deref()?;
    while let Some(right) = cur.right.as_deref() {
        cur = right;
    }
    Some(&cur.item)
}

/// In-order (ascending, `forward = true`) or reverse in-order walk of every
/// node with a key in `[lo, hi]` (`lo`/`hi` given in BST order, not
/// necessarily `start`/`stop` order). Stops as soon as `visit` returns `false`.
pub(crate) fn visit_range<T, C>(
    node: &Node<T>,
    lo: &T,
    hi: &T,
    forward: bool,
    cmp: &C,
    visit: &mut dyn FnMut(&T) -> bool,
) -> bool
where
    C: Comparator<T>,
{
    let (first, second) = if forward {
        (&node.left, &node.right)
    } else {
        (&node.right, &node.left)
    };

    let in_range_to_first = if forward {
        cmp.cmp_bst(&node.item, lo) > 0
    } else {
        cmp.cmp_bst(&node.item, hi) < 0
    };

    if in_range_to_first {
        if let Some(child) = first.as_deref() {
            if !visit_range(child, lo, hi, forward, cmp, visit) {
                return false;
            }
        }
    }

    if cmp.cmp_bst(&node.item, lo) >= 0 && cmp.cmp_bst(&node.item, hi) <= 0 {
        if !visit(&node.item) {
            return false;
        }
    }

    let in_range_to_second = if forward {
        cmp.cmp_bst(&node.item, hi) < 0
    } else {
        cmp.cmp_bst(&node.item, lo) > 0
    };

    if in_range_to_second {
        if let Some(child) = second.as_deref() {
            if !visit_range(child, lo, hi, forward, cmp, visit) {
                return false;
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::EndpointComparator;
    use crate::ops::insert_into;

    fn build(items: &[(i64, i64)]) -> Link<(i64, i64)> {
        let cmp = EndpointComparator;
        let mut link = None;
        for (i, item) in items.iter().enumerate() {
            link = insert_into(link, *item, (i as u64 + 1) * 7919, &cmp).0;
        }
        link
    }

    const P: &[(i64, i64)] = &[
        (0, 6),
        (0, 5),
        (1, 8),
        (1, 7),
        (1, 5),
        (1, 4),
        (2, 8),
        (2, 7),
        (4, 8),
        (6, 7),
        (7, 9),
    ];

    #[test]
    fn cover_lcp_finds_the_smallest_covering_interval() {
        let cmp = EndpointComparator;
        let tree = build(P);

        assert_eq!(cover_lcp(&tree, &(0, 5), &cmp), Some(&(0, 5)));
        assert_eq!(cover_lcp(&tree, &(5, 5), &cmp), Some(&(4, 8)));
        assert_eq!(cover_lcp(&tree, &(8, 9), &cmp), Some(&(7, 9)));
        assert_eq!(cover_lcp(&tree, &(3, 8), &cmp), Some(&(2, 8)));
        assert_eq!(cover_lcp(&tree, &(19, 55), &cmp), None);
    }

    #[test]
    fn cover_scp_finds_the_largest_covering_interval() {
        let cmp = EndpointComparator;
        let tree = build(P);

        assert_eq!(cover_scp(&tree, &(7, 7), &cmp), Some(&(1, 8)));
        assert_eq!(cover_scp(&tree, &(3, 6), &cmp), Some(&(0, 6)));
        assert_eq!(cover_scp(&tree, &(3, 7), &cmp), Some(&(1, 8)));
        assert_eq!(cover_scp(&tree, &(0, 7), &cmp), None);
    }

    #[test]
    fn intersects_matches_linear_scan() {
        let cmp = EndpointComparator;
        let tree = build(P);

        for probe in [(7, 7), (10, 15), (5, 6), (0, 0)] {
            let expected = P.iter().any(|it| cmp.intersects(it, &probe));
            assert_eq!(intersects(&tree, &probe, &cmp), expected, "probe {probe:?}");
        }
    }

    #[test]
    fn min_max() {
        let tree = build(P);
        assert_eq!(min(&tree), Some(&(0, 6)));
        assert_eq!(max(&tree), Some(&(7, 9)));
        assert_eq!(min::<(i64, i64)>(&None), None);
    }
}
