use crate::vmm::types::FrameIndex;

/// Free-frame accounting for one storage tier, either RAM or the swap area.
///
/// Frames are handed out from the high end of the free set and the set is
/// kept sorted, so consecutive allocations walk downwards through frame
/// numbers and freed frames slot back into order.
#[derive(Debug)]
pub struct FramePool {
    free: Vec<FrameIndex>,
    capacity: usize,
}

impl FramePool {
    /// Creates a pool with frames `0..capacity` free.
    pub fn new(capacity: usize) -> FramePool {
        FramePool {
            free: (0..capacity).collect(),
            capacity,
        }
    }

    /// Takes the highest-numbered free frame, or `None` when the tier is
    /// fully occupied.
    pub fn allocate(&mut self) -> Option<FrameIndex> {
        self.free.pop()
    }

    /// Returns a frame to the free set. Releasing a frame that is already
    /// free is a caller bug.
    pub fn release(&mut self, frame: FrameIndex) {
        debug_assert!(frame < self.capacity, "frame {} is out of range", frame);
        match self.free.binary_search(&frame) {
            Ok(_) => debug_assert!(false, "frame {} released twice", frame),
            Err(position) => self.free.insert(position, frame),
        }
    }

    /// Number of frames currently free.
    pub fn count(&self) -> usize {
        self.free.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// The free set in ascending frame order.
    pub fn free_frames(&self) -> &[FrameIndex] {
        &self.free
    }
}
