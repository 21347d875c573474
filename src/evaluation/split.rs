//! Midpoint splitting of infeasible routes.

/// Splits a route at `len / 2`, keeping stop order within each half.
///
/// A single-stop route yields an empty first half.
///
/// # Examples
///
/// ```
/// use delivery_routing::evaluation::split_at_midpoint;
///
/// assert_eq!(split_at_midpoint(&[4, 7, 1, 9, 2]), (vec![4, 7], vec![1, 9, 2]));
/// assert_eq!(split_at_midpoint(&[3]), (vec![], vec![3]));
/// ```
pub fn split_at_midpoint(route: &[usize]) -> (Vec<usize>, Vec<usize>) {
    let (first, second) = route.split_at(route.len() / 2);
    (first.to_vec(), second.to_vec())
}

/// Halves a route until every fragment is feasible or a single stop.
///
/// Fragments come back in route order and are never empty.
///
/// # Examples
///
/// ```
/// use delivery_routing::evaluation::split_until_feasible;
///
/// // at most two stops per fragment
/// let fragments = split_until_feasible(&[1, 2, 3, 4, 5], &|r: &[usize]| r.len() <= 2);
/// assert_eq!(fragments, vec![vec![1, 2], vec![3], vec![4, 5]]);
/// ```
pub fn split_until_feasible<F>(route: &[usize], is_feasible: &F) -> Vec<Vec<usize>>
where
    F: Fn(&[usize]) -> bool + ?Sized,
{
    if route.is_empty() {
        return Vec::new();
    }
    if route.len() == 1 || is_feasible(route) {
        return vec![route.to_vec()];
    }
    let (first, second) = route.split_at(route.len() / 2);
    let mut fragments = split_until_feasible(first, is_feasible);
    fragments.extend(split_until_feasible(second, is_feasible));
    fragments
}
