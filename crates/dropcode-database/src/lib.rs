//! # dropcode-database
//!
//! Row store contract for shares plus its PostgreSQL and in-memory
//! implementations.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryShareStore;
pub use repositories::ShareRepository;
pub use store::ShareStore;
