//! Core types and data structures for BucketIndex.
//!
//! This module contains the fundamental data structures, type definitions,
//! and constants used throughout the index implementation.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::arena::{EntryArena, EntryId};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Smallest threshold for which a split leaves both halves non-empty.
pub const MIN_THRESHOLD: u64 = 2;

/// Largest threshold a bucket's entry arena can address.
pub const MAX_THRESHOLD: u64 = u32::MAX as u64 - 1;

// ============================================================================
// TYPE DEFINITIONS
// ============================================================================

/// Opaque record identifier stored alongside each key.
pub type RecordId = u64;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// Concurrent in-memory sorted index from keys to record identifiers.
///
/// The index is a single level of buckets ordered by their smallest key. Each
/// bucket holds a sorted chain of entries and is split in two once it reaches
/// the threshold, which keeps both the bucket search and the chain walk short.
///
/// # Type Parameters
///
/// * `K` - Key type that must implement `Ord`
///
/// # Examples
///
/// ```
/// use bucket_index::BucketIndex;
///
/// let index = BucketIndex::new(4).unwrap();
/// for (key, record_id) in [(5, 50), (1, 10), (3, 30), (2, 20), (4, 40)] {
///     index.insert(key, record_id).unwrap();
/// }
///
/// assert_eq!(index.search(&3).unwrap(), 30);
/// assert_eq!(index.collect_range(&2, &4).unwrap(), vec![20, 30, 40]);
/// assert!(index.delete(&3, 30));
/// assert!(index.search(&3).unwrap_err().is_not_found());
/// ```
///
/// # Locking
///
/// The bucket array is guarded by one read-write lock and every bucket by its
/// own. Lookups and scans share both; `insert` and `delete` hold the array lock
/// exclusively for their whole duration, so mutations are fully serialized.
#[derive(Debug)]
pub struct BucketIndex<K> {
    /// Bucket count at which a bucket is split in two.
    pub(crate) threshold: u64,
    /// The bucket array and the running entry total.
    pub(crate) shape: RwLock<IndexShape<K>>,
}

/// State guarded by the index-level lock.
#[derive(Debug)]
pub(crate) struct IndexShape<K> {
    /// Buckets sorted ascending by head key.
    pub(crate) buckets: Vec<Arc<Bucket<K>>>,
    /// Sum of all bucket counts.
    pub(crate) count: u64,
}

impl<K> Default for IndexShape<K> {
    fn default() -> Self {
        Self {
            buckets: Vec::new(),
            count: 0,
        }
    }
}

/// An independently lockable sorted chain of entries.
#[derive(Debug)]
pub struct Bucket<K> {
    pub(crate) chain: RwLock<Chain<K>>,
}

/// A sorted singly-linked chain of entries stored in an arena.
#[derive(Debug)]
pub struct Chain<K> {
    pub(crate) entries: EntryArena<Entry<K>>,
    /// First (smallest) entry, or `NULL_ENTRY` when the chain is empty.
    pub(crate) head: EntryId,
    pub(crate) count: u64,
}

/// One stored key/record pair.
#[derive(Debug, Clone)]
pub struct Entry<K> {
    pub(crate) key: K,
    pub(crate) record_id: RecordId,
    pub(crate) next: EntryId,
}

impl<K> Entry<K> {
    /// The entry's key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The entry's record identifier.
    pub fn record_id(&self) -> RecordId {
        self.record_id
    }
}
