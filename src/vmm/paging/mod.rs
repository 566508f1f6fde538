pub mod engine;
pub mod page_table;
pub mod relocation;
pub mod testing;

pub use engine::{EngineError, PagingEngine};
pub use page_table::{PageLocation, PageTable, PageTableEntry};
pub use relocation::RelocationQueue;
