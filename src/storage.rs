//! Storage abstraction layer for Pantry.
//!
//! The corpus writer, the model artifact and the recommendation history all
//! go through the [`Storage`] trait, so tests can run against
//! [`memory::MemoryStorage`] while the CLI uses [`file::FileStorage`].
//!
//! # Example
//!
//! ```
//! use pantry::storage::{read_all, write_atomic};
//! use pantry::storage::memory::MemoryStorage;
//!
//! # fn main() -> pantry::error::Result<()> {
//! let storage = MemoryStorage::new();
//! write_atomic(&storage, "cleaned_recipes.json", b"[]")?;
//! assert_eq!(read_all(&storage, "cleaned_recipes.json")?, b"[]");
//! # Ok(())
//! # }
//! ```

pub mod file;
pub mod memory;
pub mod traits;

pub use traits::{
    Storage, StorageConfig, StorageError, StorageInput, StorageOutput, read_all, write_atomic,
};
