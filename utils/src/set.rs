use std::hash::Hash;

use fnv::{FnvBuildHasher, FnvHashSet};

/// Returns the position of the first element of `items` equal to an earlier one.
pub fn first_duplicate<T, I>(items: I) -> Option<usize>
where
    T: Eq + Hash,
    I: IntoIterator<Item = T>,
{
    let items = items.into_iter();
    let mut seen: FnvHashSet<T> = FnvHashSet::with_capacity_and_hasher(items.size_hint().0, FnvBuildHasher::default());
    for (i, x) in items.enumerate() {
        if !seen.insert(x) {
            return Some(i);
        }
    }
    None
}

pub fn all_distinct<T, I>(items: I) -> bool
where
    T: Eq + Hash,
    I: IntoIterator<Item = T>,
{
    first_duplicate(items).is_none()
}
