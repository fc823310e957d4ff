//! Binary search over bucket heads.
//!
//! The locator maps a key to the bucket whose range `[head(i), head(i + 1))`
//! contains it. It only reads bucket heads, taking each probed bucket's lock in
//! shared mode, so it can run under either a shared or an exclusive index lock.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::error::IndexError;
use crate::types::Bucket;

/// Why a key could not be placed in a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LocateError {
    /// There are no buckets.
    EmptyIndex,
    /// The key is below the first bucket's head.
    TooSmall,
    /// The search exhausted without a range match.
    NotFound { insertion_point: usize },
    /// A bucket in the array had no head.
    EmptyBucket { position: usize },
}

impl From<LocateError> for IndexError {
    fn from(err: LocateError) -> Self {
        match err {
            LocateError::EmptyIndex => IndexError::EmptyIndex,
            LocateError::TooSmall => IndexError::TooSmall,
            LocateError::NotFound { .. } => IndexError::NotFound,
            LocateError::EmptyBucket { position } => IndexError::corrupted(
                "Bucket array",
                &format!("bucket {} has no entries", position),
            ),
        }
    }
}

/// Compare `key` against the head of `buckets[position]`.
fn cmp_head<K: Ord>(
    buckets: &[Arc<Bucket<K>>],
    position: usize,
    key: &K,
) -> Result<Ordering, LocateError> {
    let chain = buckets[position].read();
    chain
        .head_key()
        .map(|head| key.cmp(head))
        .ok_or(LocateError::EmptyBucket { position })
}

/// Find the bucket whose key range contains `key`.
pub(crate) fn locate<K: Ord>(buckets: &[Arc<Bucket<K>>], key: &K) -> Result<usize, LocateError> {
    if buckets.is_empty() {
        return Err(LocateError::EmptyIndex);
    }

    if cmp_head(buckets, 0, key)? == Ordering::Less {
        return Err(LocateError::TooSmall);
    }

    let last = buckets.len() - 1;
    let mut left = 0;
    let mut right = last;

    while left <= right {
        let mid = left + (right - left) / 2;

        match cmp_head(buckets, mid, key)? {
            Ordering::Less => match mid.checked_sub(1) {
                Some(below) => right = below,
                None => break,
            },
            Ordering::Equal => return Ok(mid),
            Ordering::Greater => {
                if mid == last || cmp_head(buckets, mid + 1, key)? == Ordering::Less {
                    return Ok(mid);
                }
                left = mid + 1;
            }
        }
    }

    Err(LocateError::NotFound {
        insertion_point: left,
    })
}

/// Widen `position` backwards over buckets that may still hold `key`.
///
/// Adjacent buckets can share a head key when a run of duplicates was split,
/// and the locator may land on any bucket of such a run. An earlier bucket can
/// only end with `key` if the bucket after it starts with `key`.
pub(crate) fn widen_backward<K: Ord>(
    buckets: &[Arc<Bucket<K>>],
    mut position: usize,
    key: &K,
) -> usize {
    while position > 0 && cmp_head(buckets, position, key) == Ok(Ordering::Equal) {
        let previous_holds_key = buckets[position - 1]
            .read()
            .last_key()
            .is_some_and(|last| last == key);
        if !previous_holds_key {
            break;
        }
        position -= 1;
    }
    position
}

/// Widen `position` forwards over following buckets that start with `key`.
pub(crate) fn widen_forward<K: Ord>(
    buckets: &[Arc<Bucket<K>>],
    mut position: usize,
    key: &K,
) -> usize {
    while position + 1 < buckets.len()
        && cmp_head(buckets, position + 1, key) == Ok(Ordering::Equal)
    {
        position += 1;
    }
    position
}
