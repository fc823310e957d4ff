//! Bucket and chain implementations for BucketIndex.
//!
//! A bucket is the unit of locking and splitting below the index-level lock.
//! Its chain keeps entries in ascending key order; every splice and unlink
//! updates the head in the same step, so the head always names the smallest
//! live entry.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::cmp::Ordering;

use crate::arena::{ArenaStats, EntryArena, EntryId, NULL_ENTRY};
use crate::types::{Bucket, Chain, Entry, RecordId};

// ============================================================================
// BUCKET
// ============================================================================

impl<K> Bucket<K> {
    pub(crate) fn from_chain(chain: Chain<K>) -> Self {
        Self {
            chain: RwLock::new(chain),
        }
    }

    /// Lock the chain for reading.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Chain<K>> {
        self.chain.read()
    }

    /// Lock the chain for writing.
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Chain<K>> {
        self.chain.write()
    }

    /// Number of entries, read under the bucket's own lock.
    pub(crate) fn len(&self) -> u64 {
        self.read().len()
    }
}

impl<K: Ord> Bucket<K> {
    /// Creates a bucket holding a single entry.
    pub(crate) fn with_entry(key: K, record_id: RecordId) -> Self {
        let mut chain = Chain::new();
        chain.insert_sorted(key, record_id);
        Self::from_chain(chain)
    }
}

// ============================================================================
// CHAIN
// ============================================================================

impl<K> Chain<K> {
    pub(crate) fn new() -> Self {
        Self {
            entries: EntryArena::new(),
            head: NULL_ENTRY,
            count: 0,
        }
    }

    /// Returns the number of entries in this chain.
    pub fn len(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.head == NULL_ENTRY
    }

    /// Iterate the entries front to back.
    pub fn iter(&self) -> ChainIter<'_, K> {
        ChainIter {
            entries: &self.entries,
            cursor: self.head,
        }
    }

    /// The smallest key, used to order buckets.
    pub fn head_key(&self) -> Option<&K> {
        self.entries.get(self.head).map(Entry::key)
    }

    /// The largest key. Walks the whole chain.
    pub fn last_key(&self) -> Option<&K> {
        self.iter().last().map(Entry::key)
    }

    pub(crate) fn arena_stats(&self) -> ArenaStats {
        self.entries.stats()
    }

    pub(crate) fn allocated_entries(&self) -> usize {
        self.entries.len()
    }

    /// Allocate a new entry right after `after`, or at the front when `after`
    /// is `NULL_ENTRY`.
    fn link_after(&mut self, after: EntryId, key: K, record_id: RecordId) -> EntryId {
        let next = match self.entries.get(after) {
            Some(prev) => prev.next,
            None => self.head,
        };
        let id = self.entries.allocate(Entry {
            key,
            record_id,
            next,
        });
        match self.entries.get_mut(after) {
            Some(prev) => prev.next = id,
            None => self.head = id,
        }
        self.count += 1;
        id
    }

    /// Unlink `id`, whose predecessor is `prev` and successor is `next`.
    fn unlink(&mut self, prev: EntryId, id: EntryId, next: EntryId) {
        match self.entries.get_mut(prev) {
            Some(entry) => entry.next = next,
            None => self.head = next,
        }
        self.entries.deallocate(id);
        self.count -= 1;
    }
}

impl<K: Ord> Chain<K> {
    /// Record id of the first entry whose key equals `key`.
    pub fn find(&self, key: &K) -> Option<RecordId> {
        self.iter()
            .find(|entry| entry.key == *key)
            .map(Entry::record_id)
    }

    /// Splice a new entry into its sorted position.
    ///
    /// A smaller key goes before the current entry. An equal key walks past the
    /// run of equal keys unless the run ends the chain. A larger key goes right
    /// after the current entry once the following key is not smaller than it.
    pub(crate) fn insert_sorted(&mut self, key: K, record_id: RecordId) {
        let mut prev = NULL_ENTRY;
        let mut cursor = self.head;

        while let Some(current) = self.entries.get(cursor) {
            let next = current.next;
            let splice_after = match key.cmp(&current.key) {
                Ordering::Less => Some(prev),
                Ordering::Equal => (next == NULL_ENTRY).then_some(cursor),
                Ordering::Greater => match self.entries.get(next) {
                    None => Some(cursor),
                    Some(following) if key <= following.key => Some(cursor),
                    Some(_) => None,
                },
            };

            if let Some(after) = splice_after {
                self.link_after(after, key, record_id);
                return;
            }

            prev = cursor;
            cursor = next;
        }

        // Empty chain: the new entry becomes the head.
        self.link_after(NULL_ENTRY, key, record_id);
    }

    /// Remove the entry matching both `key` and `record_id`.
    ///
    /// Returns whether an entry was removed; at most one is.
    pub(crate) fn remove(&mut self, key: &K, record_id: RecordId) -> bool {
        let mut prev = NULL_ENTRY;
        let mut cursor = self.head;

        while let Some(current) = self.entries.get(cursor) {
            let next = current.next;
            match current.key.cmp(key) {
                Ordering::Less => {}
                Ordering::Equal if current.record_id == record_id => {
                    self.unlink(prev, cursor, next);
                    return true;
                }
                Ordering::Equal => {}
                Ordering::Greater => return false,
            }

            prev = cursor;
            cursor = next;
        }

        false
    }

    /// Split this chain at its midpoint, returning the upper half.
    ///
    /// This chain keeps the first `len / 2` entries; the entry after them
    /// becomes the head of the returned chain. Returns `None` for chains too
    /// short to split.
    pub(crate) fn split_off_half(&mut self) -> Option<Chain<K>> {
        let keep = self.count / 2;
        if keep == 0 {
            return None;
        }

        let mut last_kept = self.head;
        for _ in 1..keep {
            last_kept = self.entries.get(last_kept)?.next;
        }
        let cut = std::mem::replace(&mut self.entries.get_mut(last_kept)?.next, NULL_ENTRY);

        let mut upper = Chain::new();
        let mut upper_tail = NULL_ENTRY;
        let mut cursor = cut;
        while let Some(entry) = self.entries.deallocate(cursor) {
            cursor = entry.next;
            upper_tail = upper.link_after(upper_tail, entry.key, entry.record_id);
        }

        self.count = keep;
        Some(upper)
    }
}

impl<K> Default for Chain<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Front-to-back iterator over a chain's entries.
pub struct ChainIter<'a, K> {
    entries: &'a EntryArena<Entry<K>>,
    cursor: EntryId,
}

impl<'a, K> Iterator for ChainIter<'a, K> {
    type Item = &'a Entry<K>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.get(self.cursor)?;
        self.cursor = entry.next;
        Some(entry)
    }
}
