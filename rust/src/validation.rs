//! Validation and introspection utilities for BucketIndex.
//!
//! `check_invariants` holds the index lock for the whole check so it sees one
//! consistent shape. `bucket_sizes` and `arena_stats` instead snapshot the
//! bucket array under a brief lock and then read each bucket under its own
//! lock, so they never hold up writers for long.

use std::sync::Arc;

use crate::arena::ArenaStats;
use crate::error::{IndexError, IndexResult};
use crate::types::{Bucket, BucketIndex};

// ============================================================================
// VALIDATION METHODS
// ============================================================================

impl<K: Ord> BucketIndex<K> {
    /// Check that the index maintains all of its structural invariants.
    ///
    /// * no bucket in the array is empty
    /// * every chain is sorted and exactly as long as its count
    /// * every bucket's keys are `<=` the next bucket's keys
    /// * the index count is the sum of the bucket counts
    pub fn check_invariants(&self) -> IndexResult<()> {
        let shape = self.shape.read();
        let mut total = 0u64;

        for (position, bucket) in shape.buckets.iter().enumerate() {
            let chain = bucket.read();
            if chain.is_empty() {
                return Err(IndexError::corrupted(
                    "Bucket array",
                    &format!("bucket {} is empty", position),
                ));
            }

            let mut walked = 0u64;
            let mut previous = None;
            for entry in chain.iter() {
                if previous.is_some_and(|prev| prev > entry.key()) {
                    return Err(IndexError::corrupted(
                        "Chain order",
                        &format!("bucket {} is not sorted at entry {}", position, walked),
                    ));
                }
                previous = Some(entry.key());
                walked += 1;
            }

            if walked != chain.len() || chain.allocated_entries() as u64 != chain.len() {
                return Err(IndexError::corrupted(
                    "Chain length",
                    &format!(
                        "bucket {} counts {} entries, chain has {}, arena holds {}",
                        position,
                        chain.len(),
                        walked,
                        chain.allocated_entries()
                    ),
                ));
            }

            if let Some(next) = shape.buckets.get(position + 1) {
                let next_chain = next.read();
                if let (Some(last), Some(next_head)) = (chain.last_key(), next_chain.head_key()) {
                    if last > next_head {
                        return Err(IndexError::corrupted(
                            "Bucket order",
                            &format!("bucket {} overlaps bucket {}", position, position + 1),
                        ));
                    }
                }
            }

            total += chain.len();
        }

        if total != shape.count {
            return Err(IndexError::corrupted(
                "Entry count",
                &format!("{} in buckets vs {} in index", total, shape.count),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// INTROSPECTION
// ============================================================================

impl<K> BucketIndex<K> {
    /// Clone the bucket array under a brief shared lock.
    fn snapshot(&self) -> Vec<Arc<Bucket<K>>> {
        self.shape.read().buckets.clone()
    }

    /// Returns the entry count of every bucket, in key order.
    pub fn bucket_sizes(&self) -> Vec<u64> {
        self.snapshot().iter().map(|bucket| bucket.len()).collect()
    }

    /// Combined entry-arena statistics over all buckets.
    pub fn arena_stats(&self) -> ArenaStats {
        self.snapshot()
            .iter()
            .map(|bucket| bucket.read().arena_stats())
            .fold(ArenaStats::default(), ArenaStats::merge)
    }
}
