use std::collections::VecDeque;

use crate::vmm::types::PageKey;

/// Eviction-order queue over the RAM-resident pages; the front is the next
/// victim.
///
/// The queue itself is policy-free. FIFO simply never reorders it, while
/// LRU re-queues a page on every resident hit via [`RelocationQueue::touch`],
/// so the front decays into the least recently used page.
#[derive(Debug, Default)]
pub struct RelocationQueue {
    order: VecDeque<PageKey>,
}

impl RelocationQueue {
    pub fn new() -> RelocationQueue {
        RelocationQueue::default()
    }

    /// Appends a page at the newest position.
    pub fn push_back(&mut self, key: PageKey) {
        self.order.push_back(key);
    }

    /// Takes the current victim, the oldest position.
    pub fn pop_front(&mut self) -> Option<PageKey> {
        self.order.pop_front()
    }

    /// Moves a page to the newest position. Does nothing when the page is
    /// not queued.
    pub fn touch(&mut self, key: &PageKey) {
        if let Some(position) = self.order.iter().position(|queued| queued == key) {
            self.order.remove(position);
            self.order.push_back(key.clone());
        }
    }

    /// Removes a page wherever it sits. Does nothing when the page is not
    /// queued.
    pub fn remove(&mut self, key: &PageKey) {
        if let Some(position) = self.order.iter().position(|queued| queued == key) {
            self.order.remove(position);
        }
    }

    pub fn contains(&self, key: &PageKey) -> bool {
        self.order.contains(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageKey> {
        self.order.iter()
    }
}
