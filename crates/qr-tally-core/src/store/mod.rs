pub mod backend;
pub mod durable;
pub mod rocks;

pub use backend::{KvBackend, MemoryBackend};
pub use durable::DurableStore;
pub use rocks::RocksBackend;
