//! GET operations for BucketIndex.
//!
//! This module contains the point-lookup operations. All of them take the
//! index lock in shared mode and the bucket locks in shared mode, so any number
//! of lookups run in parallel while no mutation is in progress.

use crate::error::{IndexError, IndexResult};
use crate::locator::{locate, widen_backward, widen_forward};
use crate::types::{BucketIndex, Entry, RecordId};

impl<K> BucketIndex<K> {
    /// Returns the number of entries in the index.
    pub fn len(&self) -> u64 {
        self.shape.read().count
    }

    /// Returns true if the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of buckets currently in the index.
    pub fn bucket_count(&self) -> usize {
        self.shape.read().buckets.len()
    }
}

impl<K: Ord> BucketIndex<K> {
    /// Look up the record id stored under `key`.
    ///
    /// When the key was inserted several times, one of its record ids is
    /// returned; use [`search_all`](Self::search_all) to get every one.
    ///
    /// # Errors
    ///
    /// * `EmptyIndex` - the index has no buckets
    /// * `TooSmall` - `key` is smaller than every stored key
    /// * `NotFound` - no entry has this key
    ///
    /// # Examples
    ///
    /// ```
    /// use bucket_index::BucketIndex;
    ///
    /// let index = BucketIndex::new(16).unwrap();
    /// assert!(index.search(&1).unwrap_err().is_empty_index());
    ///
    /// index.insert(100, 7).unwrap();
    /// assert_eq!(index.search(&100).unwrap(), 7);
    /// assert!(index.search(&50).unwrap_err().is_too_small());
    /// assert!(index.search(&150).unwrap_err().is_not_found());
    /// ```
    pub fn search(&self, key: &K) -> IndexResult<RecordId> {
        let shape = self.shape.read();
        let position = locate(&shape.buckets, key)?;

        let chain = shape.buckets[position].read();
        chain.find(key).ok_or(IndexError::NotFound)
    }

    /// Check if any entry has this key.
    pub fn contains(&self, key: &K) -> bool {
        self.search(key).is_ok()
    }

    /// Every record id stored under `key`, in chain order.
    ///
    /// Returns an empty vector when the key is absent but could be placed, and
    /// the locator error (`EmptyIndex` or `TooSmall`) when it could not.
    pub fn search_all(&self, key: &K) -> IndexResult<Vec<RecordId>> {
        let shape = self.shape.read();
        let located = locate(&shape.buckets, key)?;
        let first = widen_backward(&shape.buckets, located, key);
        let last = widen_forward(&shape.buckets, located, key);

        let mut record_ids = Vec::new();
        for bucket in &shape.buckets[first..=last] {
            let chain = bucket.read();
            record_ids.extend(
                chain
                    .iter()
                    .skip_while(|entry| entry.key < *key)
                    .take_while(|entry| entry.key == *key)
                    .map(Entry::record_id),
            );
        }
        Ok(record_ids)
    }
}

impl<K: Ord + Clone> BucketIndex<K> {
    /// Returns the entry with the smallest key.
    pub fn first(&self) -> Option<(K, RecordId)> {
        let shape = self.shape.read();
        let chain = shape.buckets.first()?.read();
        let entry = chain.iter().next()?;
        Some((entry.key.clone(), entry.record_id))
    }

    /// Returns the entry with the largest key.
    pub fn last(&self) -> Option<(K, RecordId)> {
        let shape = self.shape.read();
        let chain = shape.buckets.last()?.read();
        let entry = chain.iter().last()?;
        Some((entry.key.clone(), entry.record_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_error_kinds() {
        let index = BucketIndex::new(8).unwrap();
        assert!(matches!(index.search(&10), Err(IndexError::EmptyIndex)));

        index.insert(10, 100).unwrap();
        assert!(matches!(index.search(&5), Err(IndexError::TooSmall)));
        assert!(matches!(index.search(&20), Err(IndexError::NotFound)));
        assert_eq!(index.search(&10).unwrap(), 100);
    }

    #[test]
    fn test_search_absent_key_inside_bucket_range() {
        let index = BucketIndex::new(8).unwrap();
        for key in [10, 20, 30] {
            index.insert(key, key as u64).unwrap();
        }
        assert!(index.search(&15).unwrap_err().is_not_found());
        assert!(index.contains(&20));
        assert!(!index.contains(&25));
    }

    #[test]
    fn test_search_all_spans_split_duplicates() {
        let index = BucketIndex::new(4).unwrap();
        index.insert(1, 1).unwrap();
        for record_id in 10..20 {
            index.insert(5, record_id).unwrap();
        }
        index.insert(9, 9).unwrap();
        assert!(index.bucket_count() > 1);

        let mut found = index.search_all(&5).unwrap();
        found.sort_unstable();
        assert_eq!(found, (10..20).collect::<Vec<_>>());
        assert!(index.search_all(&7).unwrap().is_empty());
        assert!(index.search_all(&0).unwrap_err().is_too_small());
    }

    #[test]
    fn test_first_and_last() {
        let index = BucketIndex::new(4).unwrap();
        assert_eq!(index.first(), None);
        assert_eq!(index.last(), None);

        for key in [40, 10, 30, 20, 50, 60] {
            index.insert(key, key as u64 * 10).unwrap();
        }
        assert_eq!(index.first(), Some((10, 100)));
        assert_eq!(index.last(), Some((60, 600)));
    }

    #[test]
    fn test_len_tracks_entries() {
        let index = BucketIndex::new(4).unwrap();
        for key in 0..10 {
            index.insert(key, key as u64).unwrap();
        }
        assert_eq!(index.len(), 10);
        assert!(index.delete(&3, 3));
        assert_eq!(index.len(), 9);
    }
}
