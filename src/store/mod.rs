pub mod durable_store;
pub mod fast_cache;
pub mod json_file_store;

pub use durable_store::{DurableStore, MemoryDurableStore, Records};
pub use fast_cache::{FastCache, MemoryFastCache};
pub use json_file_store::JsonFileStore;
