//! Range query operations for BucketIndex.
//!
//! Range scans hold the index lock in shared mode for their whole duration and
//! read-lock one bucket at a time. Record ids are handed to a callback in
//! ascending key order; a failing callback aborts the scan.

use std::convert::Infallible;
use std::ops::{Bound, RangeBounds};
use std::sync::Arc;

use crate::error::{CallbackError, IndexError, IndexResult, IndexResultExt, RangeBound};
use crate::locator::{locate, widen_backward, widen_forward, LocateError};
use crate::types::{Bucket, BucketIndex, RecordId};

// ============================================================================
// RANGE QUERY OPERATIONS
// ============================================================================

impl<K: Ord> BucketIndex<K> {
    /// Call `callback` with the record id of every entry whose key lies in
    /// `[start, end]`, in ascending key order.
    ///
    /// `start` should not exceed `end`; when it does nothing is emitted.
    ///
    /// # Errors
    ///
    /// * `Locate { bound, .. }` - `start` or `end` could not be placed in a
    ///   bucket (`EmptyIndex`, or `TooSmall` for a bound below the smallest key)
    /// * `Callback` - the callback failed; no further ids are emitted
    ///
    /// # Examples
    ///
    /// ```
    /// use bucket_index::BucketIndex;
    ///
    /// let index = BucketIndex::new(4).unwrap();
    /// for key in 1..=10u32 {
    ///     index.insert(key, u64::from(key) * 10).unwrap();
    /// }
    ///
    /// let mut seen = Vec::new();
    /// index
    ///     .search_range(&3, &6, |record_id| {
    ///         seen.push(record_id);
    ///         Ok::<_, std::convert::Infallible>(())
    ///     })
    ///     .unwrap();
    /// assert_eq!(seen, vec![30, 40, 50, 60]);
    ///
    /// let err = index.search_range(&0, &6, |_| Ok::<_, String>(())).unwrap_err();
    /// assert!(err.is_too_small());
    /// ```
    pub fn search_range<F, E>(&self, start: &K, end: &K, mut callback: F) -> IndexResult<()>
    where
        F: FnMut(RecordId) -> Result<(), E>,
        E: Into<CallbackError>,
    {
        let shape = self.shape.read();

        let start_position = locate(&shape.buckets, start)
            .map_err(IndexError::from)
            .while_locating(RangeBound::Start)?;
        let end_position = locate(&shape.buckets, end)
            .map_err(IndexError::from)
            .while_locating(RangeBound::End)?;

        let first = widen_backward(&shape.buckets, start_position, start);
        let last = widen_forward(&shape.buckets, end_position, end);

        scan_buckets(
            &shape.buckets,
            first,
            last,
            Bound::Included(start),
            Bound::Included(end),
            &mut callback,
        )
    }

    /// Collect the record ids of every entry whose key lies in `[start, end]`.
    pub fn collect_range(&self, start: &K, end: &K) -> IndexResult<Vec<RecordId>> {
        let mut record_ids = Vec::new();
        self.search_range(start, end, |record_id| {
            record_ids.push(record_id);
            Ok::<_, Infallible>(())
        })?;
        Ok(record_ids)
    }

    /// Scan any range of keys, using Rust's range syntax.
    ///
    /// Unlike [`search_range`](Self::search_range), bounds that fall outside the
    /// stored keys are not errors: an empty index or a range entirely below the
    /// smallest key simply emits nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucket_index::BucketIndex;
    ///
    /// let index = BucketIndex::new(4).unwrap();
    /// for key in 10..20u32 {
    ///     index.insert(key, u64::from(key)).unwrap();
    /// }
    ///
    /// let mut below = Vec::new();
    /// index.scan(..12, |id| { below.push(id); Ok::<_, String>(()) }).unwrap();
    /// assert_eq!(below, vec![10, 11]);
    ///
    /// let mut tail = Vec::new();
    /// index.scan((std::ops::Bound::Excluded(17), std::ops::Bound::Unbounded), |id| {
    ///     tail.push(id);
    ///     Ok::<_, String>(())
    /// }).unwrap();
    /// assert_eq!(tail, vec![18, 19]);
    /// ```
    pub fn scan<R, F, E>(&self, range: R, mut callback: F) -> IndexResult<()>
    where
        R: RangeBounds<K>,
        F: FnMut(RecordId) -> Result<(), E>,
        E: Into<CallbackError>,
    {
        let shape = self.shape.read();
        if shape.buckets.is_empty() {
            return Ok(());
        }

        let first = match range.start_bound() {
            Bound::Unbounded => 0,
            Bound::Included(key) | Bound::Excluded(key) => match locate(&shape.buckets, key) {
                Ok(position) => widen_backward(&shape.buckets, position, key),
                Err(LocateError::TooSmall) => 0,
                Err(LocateError::NotFound { insertion_point }) => insertion_point,
                Err(err) => return Err(err.into()),
            },
        };
        let last = shape.buckets.len() - 1;

        scan_buckets(
            &shape.buckets,
            first,
            last,
            range.start_bound(),
            range.end_bound(),
            &mut callback,
        )
    }
}

// ============================================================================
// RANGE QUERY HELPERS
// ============================================================================

/// Emit every entry of `buckets[first..=last]` that lies within the bounds.
///
/// Chains are sorted and buckets are contiguous, so the first entry above the
/// upper bound ends the whole scan.
fn scan_buckets<K, F, E>(
    buckets: &[Arc<Bucket<K>>],
    first: usize,
    last: usize,
    lower: Bound<&K>,
    upper: Bound<&K>,
    callback: &mut F,
) -> IndexResult<()>
where
    K: Ord,
    F: FnMut(RecordId) -> Result<(), E>,
    E: Into<CallbackError>,
{
    if first > last {
        return Ok(());
    }

    for bucket in &buckets[first..=last] {
        let chain = bucket.read();
        for entry in chain.iter() {
            if below_lower(lower, &entry.key) {
                continue;
            }
            if above_upper(upper, &entry.key) {
                return Ok(());
            }
            callback(entry.record_id).map_err(IndexError::callback)?;
        }
    }

    Ok(())
}

fn below_lower<K: Ord>(lower: Bound<&K>, key: &K) -> bool {
    match lower {
        Bound::Included(start) => key < start,
        Bound::Excluded(start) => key <= start,
        Bound::Unbounded => false,
    }
}

fn above_upper<K: Ord>(upper: Bound<&K>, key: &K) -> bool {
    match upper {
        Bound::Included(end) => key > end,
        Bound::Excluded(end) => key >= end,
        Bound::Unbounded => false,
    }
}
