//! Range queries over tick-ordered event lists
//!
//! Every per-category list in a [`Record`](crate::record::Record) is sorted
//! ascending by tick. These helpers binary-search such lists so a wave or a
//! scoring window can be sliced out in O(log n + k). An empty list or a range
//! outside the list yields an empty result, never an error.

/// Anything stamped with a record tick
pub trait Ticked {
    fn tick(&self) -> i32;
}

/// Index of the first element whose key is `>= needle`.
///
/// On an exact hit the search backs up over preceding duplicates so the first
/// occurrence is returned. `None` when `needle` exceeds every key.
pub fn first_greater_or_equal_index<T, K, F>(seq: &[T], needle: K, key: F) -> Option<usize>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let (mut lo, mut hi) = (0usize, seq.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match key(&seq[mid]).cmp(&needle) {
            std::cmp::Ordering::Less => lo = mid + 1,
            std::cmp::Ordering::Greater => hi = mid,
            std::cmp::Ordering::Equal => {
                let mut idx = mid;
                while idx > 0 && key(&seq[idx - 1]) == needle {
                    idx -= 1;
                }
                return Some(idx);
            }
        }
    }

    (lo < seq.len()).then_some(lo)
}

/// Index of the last element whose key is `<= needle`.
///
/// On an exact hit the search advances over following duplicates. `None` when
/// `needle` is below every key.
pub fn last_less_or_equal_index<T, K, F>(seq: &[T], needle: K, key: F) -> Option<usize>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let (mut lo, mut hi) = (0usize, seq.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match key(&seq[mid]).cmp(&needle) {
            std::cmp::Ordering::Less => lo = mid + 1,
            std::cmp::Ordering::Greater => hi = mid,
            std::cmp::Ordering::Equal => {
                let mut idx = mid;
                while idx + 1 < seq.len() && key(&seq[idx + 1]) == needle {
                    idx += 1;
                }
                return Some(idx);
            }
        }
    }

    // lo is the insertion point; everything before it is < needle
    lo.checked_sub(1)
}

/// Contiguous sub-slice with keys in `[from, to]`, duplicates included
pub fn range_slice<T, K, F>(seq: &[T], from: K, to: K, key: F) -> &[T]
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let Some(first) = first_greater_or_equal_index(seq, from, &key) else {
        return &[];
    };
    let Some(last) = last_less_or_equal_index(seq, to, &key) else {
        return &[];
    };

    if first > last {
        return &[];
    }
    &seq[first..=last]
}

/// Linear filter on a field other than the ordering key
pub fn filter_by_equality<'a, T, K, F>(seq: &'a [T], key: F, value: K) -> Vec<&'a T>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    seq.iter().filter(|item| key(*item) == value).collect()
}

/// Events with `from <= tick <= to`
pub fn range_by_tick<T: Ticked>(seq: &[T], from: i32, to: i32) -> &[T] {
    range_slice(seq, from, to, Ticked::tick)
}

/// Last event at or before `tick`
pub fn last_at_or_before<T: Ticked>(seq: &[T], tick: i32) -> Option<&T> {
    last_less_or_equal_index(seq, tick, Ticked::tick).map(|idx| &seq[idx])
}
