//! INSERT operations for BucketIndex.
//!
//! This module contains entry insertion and bucket splitting. Insertion holds
//! the index lock exclusively for the whole call, because a split reshapes the
//! bucket array.

use std::sync::Arc;
use tracing::{debug, trace};

use crate::error::IndexResult;
use crate::locator::locate;
use crate::types::{Bucket, BucketIndex, IndexShape, RecordId};

impl<K: Ord> BucketIndex<K> {
    /// Insert a key with its record id.
    ///
    /// Duplicate keys are allowed, with the same or different record ids. Once
    /// the receiving bucket reaches the threshold it is split in two.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucket_index::BucketIndex;
    ///
    /// let index = BucketIndex::new(2).unwrap();
    /// index.insert("b", 2).unwrap();
    /// index.insert("a", 1).unwrap();
    /// assert_eq!(index.len(), 2);
    /// assert_eq!(index.bucket_count(), 2);
    /// ```
    pub fn insert(&self, key: K, record_id: RecordId) -> IndexResult<()> {
        let mut shape = self.shape.write();

        if shape.buckets.is_empty() {
            shape.buckets.push(Arc::new(Bucket::with_entry(key, record_id)));
            shape.count = 1;
            debug!(record_id, "created first bucket");
            return Ok(());
        }

        // A key below every head lands in the first bucket and becomes its head.
        let position = locate(&shape.buckets, &key).unwrap_or(0);
        let bucket = Arc::clone(&shape.buckets[position]);
        let mut chain = bucket.write();

        chain.insert_sorted(key, record_id);
        shape.count += 1;
        trace!(record_id, bucket = position, "inserted entry");

        if chain.len() >= self.threshold {
            if let Some(upper) = chain.split_off_half() {
                debug!(
                    bucket = position,
                    lower = chain.len(),
                    upper = upper.len(),
                    "split bucket"
                );
                drop(chain);
                Self::insert_bucket_after(&mut shape, position, Bucket::from_chain(upper));
            }
        }

        Ok(())
    }

    /// Insert every pair from `items`, in order.
    ///
    /// Returns the number of entries inserted.
    pub fn insert_many<I>(&self, items: I) -> IndexResult<usize>
    where
        I: IntoIterator<Item = (K, RecordId)>,
    {
        let mut inserted = 0;
        for (key, record_id) in items {
            self.insert(key, record_id)?;
            inserted += 1;
        }
        Ok(inserted)
    }

    fn insert_bucket_after(shape: &mut IndexShape<K>, position: usize, bucket: Bucket<K>) {
        shape.buckets.insert(position + 1, Arc::new(bucket));
    }
}

impl<K> BucketIndex<K> {
    /// Remove every entry and bucket.
    pub fn clear(&self) {
        let mut shape = self.shape.write();
        shape.buckets.clear();
        shape.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_insert_creates_bucket() {
        let index = BucketIndex::new(4).unwrap();
        index.insert(7, 70).unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index.bucket_count(), 1);
        assert_eq!(index.search(&7).unwrap(), 70);
    }

    #[test]
    fn test_split_at_threshold() {
        let index = BucketIndex::new(4).unwrap();
        for key in [5, 1, 3] {
            index.insert(key, key as u64 * 10).unwrap();
        }
        assert_eq!(index.bucket_sizes(), vec![3]);

        index.insert(2, 20).unwrap();
        assert_eq!(index.bucket_sizes(), vec![2, 2]);

        index.insert(4, 40).unwrap();
        assert_eq!(index.bucket_sizes(), vec![2, 3]);
        assert_eq!(index.len(), 5);
        index.check_invariants().unwrap();
    }

    #[test]
    fn test_too_small_key_joins_first_bucket() {
        let index = BucketIndex::new(8).unwrap();
        for key in [50, 60, 70] {
            index.insert(key, key as u64).unwrap();
        }
        index.insert(10, 10).unwrap();

        assert_eq!(index.first(), Some((10, 10)));
        assert_eq!(index.search(&10).unwrap(), 10);
        index.check_invariants().unwrap();
    }

    #[test]
    fn test_sequential_inserts_stay_bounded() {
        let index = BucketIndex::new(16).unwrap();
        for key in 0..1_000u32 {
            index.insert(key, u64::from(key)).unwrap();
        }

        assert_eq!(index.len(), 1_000);
        assert!(index.bucket_sizes().iter().all(|&size| size < 16));
        index.check_invariants().unwrap();
    }

    #[test]
    fn test_insert_many_and_clear() {
        let index = BucketIndex::new(4).unwrap();
        let inserted = index
            .insert_many((0..20).map(|key| (key, key as u64)))
            .unwrap();
        assert_eq!(inserted, 20);
        assert_eq!(index.len(), 20);

        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.bucket_count(), 0);
        assert!(index.search(&3).unwrap_err().is_empty_index());
    }
}
