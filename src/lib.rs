pub mod config;
pub mod driver;
pub mod render;
pub mod script;
pub mod vmm;
