use crate::comparator::Comparator;
use crate::node::Link;
use crate::split_join::split;

/// All stored intervals covering `probe`, in ascending BST order — which, by
/// the superset-left tiebreak, means the least-specific cover first and the
/// most-specific cover last.
pub(crate) fn covers<T, C>(root: &Link<T>, probe: &T, cmp: &C) -> Vec<T>
where
    T: Clone,
    C: Comparator<T>,
{
    let (less, mid, _greater) = split(root.clone(), probe, cmp);
    // `greater` cannot contain a cover: its items are all BST-greater than
    // `probe`, meaning a strictly larger lower bound, which rules out covering.
    let mut out = Vec::new();
    collect_covers(&less, probe, cmp, &mut out);
    if let Some(mid) = mid {
        out.push(mid.item.clone());
    }
    out
}

fn collect_covers<T, C>(link: &Link<T>, probe: &T, cmp: &C, out: &mut Vec<T>)
where
    T: Clone,
    C: Comparator<T>,
{
    let Some(node) = link.as_deref() else {
        return;
    };
    if cmp.relate(&node.max_upper, probe).rr < 0 {
        return;
    }
    collect_covers(&node.left, probe, cmp, out);
    if cmp.covers(&node.item, probe) {
        out.push(node.item.clone());
    }
    collect_covers(&node.right, probe, cmp, out);
}

/// All stored intervals contained within `probe`, in ascending BST order.
pub(crate) fn covered_by<T, C>(root: &Link<T>, probe: &T, cmp: &C) -> Vec<T>
where
    T: Clone,
    C: Comparator<T>,
{
    let (_less, mid, greater) = split(root.clone(), probe, cmp);
    let mut out = Vec::new();
    if let Some(mid) = mid {
        out.push(mid.item.clone());
    }
    collect_covered_by(&greater, probe, cmp, &mut out);
    out
}

fn collect_covered_by<T, C>(link: &Link<T>, probe: &T, cmp: &C, out: &mut Vec<T>)
where
    T: Clone,
    C: Comparator<T>,
{
    let Some(node) = link.as_deref() else {
        return;
    };
    if cmp.relate(&node.min_upper, probe).rr > 0 {
        // Even the smallest upper bound in this subtree exceeds `probe`'s:
        // nothing here can be contained.
        return;
    }
    collect_covered_by(&node.left, probe, cmp, out);
    // Every item here is BST-greater than `probe` (we are in the `greater`
    // half of the split), so its lower bound already satisfies `>= probe`'s;
    // only the upper bound still needs checking.
    if cmp.relate(&node.item, probe).rr <= 0 {
        out.push(node.item.clone());
    }
    collect_covered_by(&node.right, probe, cmp, out);
}

/// All stored intervals overlapping `probe`, in ascending BST order.
pub(crate) fn intersections<T, C>(root: &Link<T>, probe: &T, cmp: &C) -> Vec<T>
where
    T: Clone,
    C: Comparator<T>,
{
    let mut out = Vec::new();
    collect_intersections(root, probe, cmp, &mut out);
    out
}

fn collect_intersections<T, C>(link: &Link<T>, probe: &T, cmp: &C, out: &mut Vec<T>)
where
    T: Clone,
    C: Comparator<T>,
{
    let Some(node) = link.as_deref() else {
        return;
    };
    if cmp.relate(&node.max_upper, probe).rl < 0 {
        return;
    }
    collect_intersections(&node.left, probe, cmp, out);
    if cmp.intersects(&node.item, probe) {
        out.push(node.item.clone());
    }
    if cmp.relate(&node.item, probe).lr > 0 {
        // This node's lower bound already exceeds `probe`'s upper bound, and
        // by BST order everything in the right subtree has an even greater
        // lower bound, so none of it can overlap either.
        return;
    }
    collect_intersections(&node.right, probe, cmp, out);
}

/// All stored intervals strictly before `probe` (they do not intersect it and
/// end at or before `probe`'s lower bound), in ascending BST order.
pub(crate) fn precedes<T, C>(root: &Link<T>, probe: &T, cmp: &C) -> Vec<T>
where
    T: Clone,
    C: Comparator<T>,
{
    let mut out = Vec::new();
    collect_precedes(root, probe, cmp, &mut out);
    out
}

fn collect_precedes<T, C>(link: &Link<T>, probe: &T, cmp: &C, out: &mut Vec<T>)
where
    T: Clone,
    C: Comparator<T>,
{
    let Some(node) = link.as_deref() else {
        return;
    };
    if cmp.relate(&node.min_upper, probe).rl > 0 {
        // Even the subtree's smallest upper bound reaches past `probe`'s
        // lower bound: nothing here precedes it.
        return;
    }
    collect_precedes(&node.left, probe, cmp, out);
    let rel = cmp.relate(&node.item, probe);
    if !cmp.intersects(&node.item, probe) && rel.rl <= 0 {
        out.push(node.item.clone());
    }
    collect_precedes(&node.right, probe, cmp, out);
}

/// All stored intervals strictly after `probe` (`probe` precedes them), in
/// ascending BST order.
///
/// Unlike [`precedes`], the qualifying condition here (`lower > probe.upper`)
/// is monotone in BST order, since BST order is primarily sorted by lower
/// bound: once a node's lower bound clears `probe`'s upper bound, every item
/// in its right subtree clears it too, and every item in its left subtree may
/// or may not. That lets this walk bulk-append an entire qualifying right
/// subtree instead of visiting it node by node.
pub(crate) fn preceded_by<T, C>(root: &Link<T>, probe: &T, cmp: &C) -> Vec<T>
where
    T: Clone,
    C: Comparator<T>,
{
    let mut out = Vec::new();
    collect_preceded_by(root, probe, cmp, &mut out);
    out
}

fn collect_preceded_by<T, C>(link: &Link<T>, probe: &T, cmp: &C, out: &mut Vec<T>)
where
    T: Clone,
    C: Comparator<T>,
{
    let Some(node) = link.as_deref() else {
        return;
    };
    if cmp.relate(&node.item, probe).lr > 0 {
        collect_preceded_by(&node.left, probe, cmp, out);
        out.push(node.item.clone());
        push_all(&node.right, out);
    } else {
        collect_preceded_by(&node.right, probe, cmp, out);
    }
}

fn push_all<T: Clone>(link: &Link<T>, out: &mut Vec<T>) {
    let Some(node) = link.as_deref() else {
        return;
    };
    push_all(&node.left, out);
    out.push(node.item.clone());
    push_all(&node.right, out);
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
            link = insert_into(link, *item, (i as u64 + 1) * 104729, &cmp).0;
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
    fn covered_by_and_covers_match_expected_results() {
        let cmp = EndpointComparator;
        let tree = build(P);

        assert_eq!(
            covered_by(&tree, &(0, 6), &cmp),
            vec![(0, 6), (0, 5), (1, 5), (1, 4)]
        );
        assert_eq!(covered_by(&tree, &(3, 6), &cmp), Vec::<(i64, i64)>::new());
        assert_eq!(
            covered_by(&tree, &(3, 11), &cmp),
            vec![(4, 8), (6, 7), (7, 9)]
        );
        assert_eq!(covers(&tree, &(0, 6), &cmp), vec![(0, 6)]);
        assert_eq!(
            covers(&tree, &(3, 7), &cmp),
            vec![(1, 8), (1, 7), (2, 8), (2, 7)]
        );
    }

    #[test]
    fn intersections_precedes_and_preceded_by_match_expected_results() {
        let cmp = EndpointComparator;
        let tree = build(P);

        assert_eq!(
            intersections(&tree, &(7, 7), &cmp),
            vec![(1, 8), (1, 7), (2, 8), (2, 7), (4, 8), (6, 7), (7, 9)]
        );
        assert_eq!(
            intersections(&tree, &(10, 15), &cmp),
            Vec::<(i64, i64)>::new()
        );
        assert_eq!(
            precedes(&tree, &(7, 7), &cmp),
            vec![(0, 6), (0, 5), (1, 5), (1, 4)]
        );
        assert_eq!(preceded_by(&tree, &(4, 4), &cmp), vec![(6, 7), (7, 9)]);
    }

    #[test]
    fn set_queries_match_linear_scan_oracle() {
        let cmp = EndpointComparator;
        let tree = build(P);

        for probe in [(0, 0), (3, 3), (5, 9), (2, 2), (1, 1), (8, 20)] {
            let mut expected_covers: Vec<_> =
                P.iter().copied().filter(|it| cmp.covers(it, &probe)).collect();
            expected_covers.sort_by_key(|it| cmp.cmp_bst(it, &(i64::MIN, i64::MAX)));
            let mut actual_covers = covers(&tree, &probe, &cmp);
            actual_covers.sort_by_key(|it| cmp.cmp_bst(it, &(i64::MIN, i64::MAX)));
            assert_eq!(actual_covers, expected_covers, "covers({probe:?})");

            let mut expected_inter: Vec<_> = P
                .iter()
                .copied()
                .filter(|it| cmp.intersects(it, &probe))
                .collect();
            expected_inter.sort();
            let mut actual_inter = intersections(&tree, &probe, &cmp);
            actual_inter.sort();
            assert_eq!(actual_inter, expected_inter, "intersections({probe:?})");
        }
    }
}
