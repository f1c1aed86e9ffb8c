use crate::comparator::Comparator;
use crate::node::Link;
use crate::query::visit_range;

/// Visits every stored item with a key in the closed range between `start`
/// and `stop`, in ascending order if `start` is BST-less-or-equal to `stop`,
/// descending otherwise. Stops as soon as `visit` returns `false`.
pub(crate) fn visit<T, C>(
    root: &Link<T>,
    start: &T,
    stop: &T,
    cmp: &C,
    visit: &mut dyn FnMut(&T) -> bool,
) where
    C: Comparator<T>,
{
    let Some(node) = root.as_deref() else {
        return;
    };

    let forward = cmp.cmp_bst(start, stop) <= 0;
    let (lo, hi) = if forward { (start, stop) } else { (stop, start) };

    visit_range(node, lo, hi, forward, cmp, visit);
}
