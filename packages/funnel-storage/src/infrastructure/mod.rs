//! Infrastructure layer - Entity source adapters

pub mod memory_source;
pub use memory_source::InMemoryEntitySource;

#[cfg(feature = "sqlite")]
pub mod sqlite_source;
#[cfg(feature = "sqlite")]
pub use sqlite_source::SqliteEntitySource;
