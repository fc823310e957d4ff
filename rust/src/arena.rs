//! Slot arena for bucket entries.
//!
//! Entries of a chain link to each other by `EntryId` rather than by pointer, so
//! unlinking an entry never leaves a dangling reference behind: a freed slot is
//! simply empty until the free list hands it out again.

/// Entry ID type for arena-based allocation
pub type EntryId = u32;

/// Marks the end of a chain.
pub const NULL_ENTRY: EntryId = u32::MAX;

/// Statistics for an entry arena
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaStats {
    pub total_slots: usize,
    pub allocated_count: usize,
    pub free_count: usize,
    pub utilization: f64,
    pub fragmentation: f64,
}

impl ArenaStats {
    /// Sum two arenas' statistics, recomputing the ratios.
    pub fn merge(self, other: ArenaStats) -> ArenaStats {
        ArenaStats::from_counts(
            self.total_slots + other.total_slots,
            self.allocated_count + other.allocated_count,
            self.free_count + other.free_count,
        )
    }

    fn from_counts(total_slots: usize, allocated_count: usize, free_count: usize) -> Self {
        let utilization = if total_slots > 0 {
            allocated_count as f64 / total_slots as f64
        } else {
            0.0
        };
        let fragmentation = if allocated_count > 0 {
            free_count as f64 / (allocated_count + free_count) as f64
        } else {
            0.0
        };

        ArenaStats {
            total_slots,
            allocated_count,
            free_count,
            utilization,
            fragmentation,
        }
    }
}

impl Default for ArenaStats {
    fn default() -> Self {
        ArenaStats::from_counts(0, 0, 0)
    }
}

/// Arena allocator with a free list for slot reuse.
#[derive(Debug)]
pub struct EntryArena<T> {
    slots: Vec<Option<T>>,
    free_list: Vec<usize>,
    allocated: usize,
}

impl<T> EntryArena<T> {
    /// Create a new empty arena
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            allocated: 0,
        }
    }

    /// Allocate a new item in the arena and return its ID
    #[inline]
    pub fn allocate(&mut self, item: T) -> EntryId {
        let index = if let Some(free_index) = self.free_list.pop() {
            self.slots[free_index] = Some(item);
            free_index
        } else {
            self.slots.push(Some(item));
            self.slots.len() - 1
        };
        self.allocated += 1;

        // Bucket sizes are capped below NULL_ENTRY at construction time.
        debug_assert!(index < NULL_ENTRY as usize);
        index as EntryId
    }

    /// Deallocate an item from the arena and return it
    #[inline]
    pub fn deallocate(&mut self, id: EntryId) -> Option<T> {
        if id == NULL_ENTRY {
            return None;
        }

        let index = id as usize;
        let item = self.slots.get_mut(index)?.take()?;
        self.free_list.push(index);
        self.allocated -= 1;
        Some(item)
    }

    /// Get a reference to an item in the arena
    #[inline]
    pub fn get(&self, id: EntryId) -> Option<&T> {
        if id == NULL_ENTRY {
            return None;
        }
        self.slots.get(id as usize)?.as_ref()
    }

    /// Get a mutable reference to an item in the arena
    #[inline]
    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut T> {
        if id == NULL_ENTRY {
            return None;
        }
        self.slots.get_mut(id as usize)?.as_mut()
    }

    /// Get the number of allocated items
    pub fn len(&self) -> usize {
        self.allocated
    }

    /// Get arena statistics
    pub fn stats(&self) -> ArenaStats {
        ArenaStats::from_counts(self.slots.len(), self.allocated, self.free_list.len())
    }
}

impl<T> Default for EntryArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_basic_operations() {
        let mut arena = EntryArena::new();

        let id1 = arena.allocate(42);
        let id2 = arena.allocate(84);
        let id3 = arena.allocate(126);

        assert_eq!(arena.get(id1), Some(&42));
        assert_eq!(arena.get(id2), Some(&84));
        assert_eq!(arena.get(id3), Some(&126));

        assert!(arena.get(id1).is_some());
        assert!(arena.get(NULL_ENTRY).is_none());

        let stats = arena.stats();
        assert_eq!(stats.allocated_count, 3);
        assert_eq!(stats.free_count, 0);
        assert_eq!(stats.utilization, 1.0);
    }

    #[test]
    fn test_deallocate_and_reuse() {
        let mut arena: EntryArena<i32> = EntryArena::new();

        let id1 = arena.allocate(42);
        let id2 = arena.allocate(84);

        assert_eq!(arena.deallocate(id1), Some(42));
        assert_eq!(arena.deallocate(id1), None);
        assert!(arena.get(id1).is_none());
        assert!(arena.get(id2).is_some());
        assert_eq!(arena.stats().free_count, 1);

        // The freed slot is handed out again
        let id3 = arena.allocate(168);
        assert_eq!(id3, id1);
        assert_eq!(arena.get(id3), Some(&168));
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.stats().free_count, 0);
    }

    #[test]
    fn test_get_mut() {
        let mut arena = EntryArena::new();
        let id = arena.allocate(String::from("a"));

        if let Some(item) = arena.get_mut(id) {
            item.push('b');
        }
        assert_eq!(arena.get(id).map(String::as_str), Some("ab"));
        assert_eq!(arena.get_mut(NULL_ENTRY), None);
    }

    #[test]
    fn test_stats_merge() {
        let mut left = EntryArena::new();
        let mut right = EntryArena::new();
        let a = left.allocate(1);
        left.allocate(2);
        right.allocate(3);
        left.deallocate(a);

        let merged = left.stats().merge(right.stats());
        assert_eq!(merged.total_slots, 3);
        assert_eq!(merged.allocated_count, 2);
        assert_eq!(merged.free_count, 1);
    }
}
