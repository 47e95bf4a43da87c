// Adapters layer: concrete storage substrates behind the domain ports.

pub mod file;
pub mod memory;
pub mod state;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
