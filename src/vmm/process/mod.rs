pub mod registry;

pub use registry::{ProcessRecord, ProcessRegistry, ProcessRegistryError};
