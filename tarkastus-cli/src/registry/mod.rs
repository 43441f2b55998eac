//! The master registry: loading, matching, merging and saving

pub mod columns;
pub mod index;
pub mod loader;
pub mod reconcile;
pub mod table;
pub mod writer;

pub use loader::{RegistryWorkbook, load_registry};
pub use reconcile::reconcile;
pub use writer::{RegistryWriter, WriteStrategy};
