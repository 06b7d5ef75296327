//! Preference store adapters.

mod in_memory;
mod postgres;

pub use in_memory::InMemoryPreferenceStore;
pub use postgres::PostgresPreferenceStore;
