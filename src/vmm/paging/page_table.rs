use std::collections::HashMap;

use crate::vmm::types::{FrameIndex, PageKey};

/// Where a page's backing frame currently lives. A page is always in
/// exactly one tier; there is no way to express both at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLocation {
    /// Resident in a RAM frame.
    Ram(FrameIndex),
    /// Swapped out to a frame of the swap area.
    Disk(FrameIndex),
}

/// Residency and modification state for one logical page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTableEntry {
    pub location: PageLocation,
    pub dirty: bool,
}

impl PageTableEntry {
    pub fn is_resident(&self) -> bool {
        matches!(self.location, PageLocation::Ram(_))
    }
}

/// Maps each (process, page) pair to its current residency.
///
/// The mutating methods take keys the engine's own bookkeeping guarantees
/// to exist; a miss there means the bookkeeping is broken, so they panic
/// instead of limping on.
#[derive(Debug, Default)]
pub struct PageTable {
    entries: HashMap<PageKey, PageTableEntry>,
}

impl PageTable {
    pub fn new() -> PageTable {
        PageTable::default()
    }

    /// Creates a resident entry with a clean modification flag, replacing
    /// any previous entry under the same key.
    pub fn insert(&mut self, key: PageKey, ram_frame: FrameIndex) {
        self.entries.insert(
            key,
            PageTableEntry {
                location: PageLocation::Ram(ram_frame),
                dirty: false,
            },
        );
    }

    /// Moves a resident page out to the given swap frame.
    pub fn mark_swapped_out(&mut self, key: &PageKey, disk_frame: FrameIndex) {
        let entry = self.entry_mut(key);
        debug_assert!(
            matches!(entry.location, PageLocation::Ram(_)),
            "page {} is already swapped out",
            key
        );
        entry.location = PageLocation::Disk(disk_frame);
    }

    /// Brings a swapped page back into the given RAM frame.
    pub fn mark_swapped_in(&mut self, key: &PageKey, ram_frame: FrameIndex) {
        let entry = self.entry_mut(key);
        debug_assert!(
            matches!(entry.location, PageLocation::Disk(_)),
            "page {} is already resident",
            key
        );
        entry.location = PageLocation::Ram(ram_frame);
    }

    /// Sets the modification flag. Idempotent, and independent of which
    /// tier currently holds the page.
    pub fn set_dirty(&mut self, key: &PageKey) {
        self.entry_mut(key).dirty = true;
    }

    pub fn remove(&mut self, key: &PageKey) -> Option<PageTableEntry> {
        self.entries.remove(key)
    }

    pub fn get(&self, key: &PageKey) -> Option<&PageTableEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PageKey, &PageTableEntry)> {
        self.entries.iter()
    }

    fn entry_mut(&mut self, key: &PageKey) -> &mut PageTableEntry {
        match self.entries.get_mut(key) {
            Some(entry) => entry,
            None => panic!("page table has no entry for page {}", key),
        }
    }
}
