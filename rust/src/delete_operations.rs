//! DELETE operations for BucketIndex.
//!
//! This module contains entry removal and the removal of buckets that become
//! empty. Like insertion, deletion holds the index lock exclusively because it
//! may shrink the bucket array.

use std::sync::Arc;
use tracing::{debug, trace};

use crate::locator::{locate, widen_backward, widen_forward};
use crate::types::{BucketIndex, RecordId};

impl<K: Ord> BucketIndex<K> {
    /// Remove the entry with this key and record id.
    ///
    /// Both must match, so removing one of several duplicates needs its exact
    /// record id. At most one entry is removed per call. Returns `true` exactly
    /// when an entry was removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucket_index::BucketIndex;
    ///
    /// let index = BucketIndex::new(16).unwrap();
    /// index.insert(3, 30).unwrap();
    /// index.insert(3, 31).unwrap();
    ///
    /// assert!(!index.delete(&3, 99));
    /// assert!(index.delete(&3, 30));
    /// assert_eq!(index.search(&3).unwrap(), 31);
    /// ```
    pub fn delete(&self, key: &K, record_id: RecordId) -> bool {
        let mut shape = self.shape.write();

        let Ok(located) = locate(&shape.buckets, key) else {
            return false;
        };

        // Duplicates of `key` may have been split across neighbouring buckets.
        let first = widen_backward(&shape.buckets, located, key);
        let last = widen_forward(&shape.buckets, located, key);

        for position in first..=last {
            let bucket = Arc::clone(&shape.buckets[position]);
            let mut chain = bucket.write();
            if !chain.remove(key, record_id) {
                continue;
            }

            shape.count -= 1;
            trace!(record_id, bucket = position, "removed entry");

            if chain.is_empty() {
                drop(chain);
                shape.buckets.remove(position);
                debug!(bucket = position, "removed empty bucket");
            }
            return true;
        }

        false
    }
}
