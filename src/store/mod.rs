pub mod memory;
pub mod mysql;

pub use memory::{MemoryState, MemoryStore, MemoryUnitOfWork};
pub use mysql::{MySqlStore, MySqlUnitOfWork};
