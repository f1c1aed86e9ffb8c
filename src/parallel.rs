use rayon::join;

use crate::comparator::Comparator;
use crate::node::{Link, PriorityRng};
use crate::ops::{insert_into, union};

/// Below this many items per worker, sequential construction already beats the
/// overhead of spawning more parallel work.
const SEQUENTIAL_THRESHOLD: usize = 1024;

/// Builds a treap from `items` using up to `workers` threads of the current
/// rayon thread pool: partitions `items` into `workers` contiguous chunks,
/// builds each chunk's sub-treap independently (recursing into more workers
/// per chunk when it is itself still large), then reduces the sub-treaps
/// pairwise via mutable [`union`] in a balanced tree, halving the number of
/// sub-treaps each round — the same halve-and-[`rayon::join`] shape the
/// sequential/parallel max-augmentation reduction in this crate's ancestry
/// uses for its own balanced merge.
///
/// Returns the built root together with the number of duplicate keys
/// collapsed along the way (within a chunk's own sequential build and across
/// every reduction union), so the caller can derive an accurate element count
/// without a separate traversal.
pub(crate) fn build_concurrent<T, C>(
    workers: usize,
    items: Vec<T>,
    cmp: &C,
    rng: &PriorityRng,
) -> (Link<T>, usize)
where
    T: Clone + Send,
    C: Comparator<T> + Sync,
{
    if workers <= 1 || items.len() <= SEQUENTIAL_THRESHOLD {
        return build_sequential(items, cmp, rng);
    }

    let mut left_items = items;
    let right_items = left_items.split_off(left_items.len() / 2);

    let left_workers = workers / 2;
    let right_workers = workers - left_workers;

    let ((left, left_dups), (right, right_dups)) = join(
        || build_concurrent(left_workers.max(1), left_items, cmp, rng),
        || build_concurrent(right_workers.max(1), right_items, cmp, rng),
    );

    let (root, union_dups) = union(left, right, false, cmp);
    (root, left_dups + right_dups + union_dups)
}

fn build_sequential<T, C>(items: Vec<T>, cmp: &C, rng: &PriorityRng) -> (Link<T>, usize)
where
    T: Clone,
    C: Comparator<T>,
{
    let mut link = None;
    let mut dups = 0;
    for item in items {
        let (new_link, was_new) = insert_into(link, item, rng.next(), cmp);
        link = new_link;
        dups += (!was_new) as usize;
    }
    (link, dups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::EndpointComparator;

    fn in_order(link: &Link<(i64, i64)>, out: &mut Vec<(i64, i64)>) {
        if let Some(node) = link {
            in_order(&node.left, out);
            out.push(node.item);
            in_order(&node.right, out);
        }
    }

    #[test]
    fn concurrent_build_matches_sequential_membership() {
        let cmp = EndpointComparator;
        let items: Vec<(i64, i64)> = (0..2000).map(|i| (i, i + (i % 7))).collect();

        let rng_a = PriorityRng::from_seed(42);
        let (sequential, seq_dups) = build_sequential(items.clone(), &cmp, &rng_a);

        let rng_b = PriorityRng::from_seed(7);
        let (concurrent, con_dups) = build_concurrent(4, items.clone(), &cmp, &rng_b);

        let mut seq_order = Vec::new();
        in_order(&sequential, &mut seq_order);
        let mut con_order = Vec::new();
        in_order(&concurrent, &mut con_order);

        assert_eq!(seq_order, con_order);
        assert_eq!(seq_order.len(), items.len());
        assert_eq!(seq_dups, 0);
        assert_eq!(con_dups, 0);
    }

    #[test]
    fn single_worker_falls_back_to_sequential() {
        let cmp = EndpointComparator;
        let items: Vec<(i64, i64)> = vec![(0, 1), (2, 3), (1, 9)];
        let rng = PriorityRng::from_seed(1);

        let (built, dups) = build_concurrent(1, items.clone(), &cmp, &rng);
        let mut order = Vec::new();
        in_order(&built, &mut order);
        assert_eq!(order.len(), items.len());
        assert_eq!(dups, 0);
    }

    #[test]
    fn concurrent_build_reports_collapsed_duplicates() {
        let cmp = EndpointComparator;
        let mut items: Vec<(i64, i64)> = (0..2000).map(|i| (i, i + (i % 7))).collect();
        items.extend(items.clone().into_iter().take(50));

        let rng = PriorityRng::from_seed(3);
        let (built, dups) = build_concurrent(4, items.clone(), &cmp, &rng);

        let mut order = Vec::new();
        in_order(&built, &mut order);
        assert_eq!(dups, 50);
        assert_eq!(order.len(), items.len() - dups);
    }
}
