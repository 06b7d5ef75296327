//! Storage adapters - ImageStorage implementations.

mod in_memory;
mod supabase;

pub use in_memory::InMemoryStorage;
pub use supabase::{SupabaseStorage, SupabaseStorageConfig};
