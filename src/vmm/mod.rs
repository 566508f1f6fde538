pub mod command;
pub mod config;
pub mod event;
pub mod frame;
pub mod paging;
pub mod process;
pub mod types;
