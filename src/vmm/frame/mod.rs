pub mod frame_pool;
pub mod ranges;

pub use frame_pool::FramePool;
pub use ranges::merge_frame_ranges;
