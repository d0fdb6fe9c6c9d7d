//! Object storage implementations - hosted bucket API and in-memory fallback.

mod memory;

#[cfg(feature = "storage")]
mod supabase;

pub use memory::InMemoryObjectStorage;

#[cfg(feature = "storage")]
pub use supabase::{StorageConfig, SupabaseStorage};
