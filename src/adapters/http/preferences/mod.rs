//! Preference endpoints: read and save the single per-user record.

mod handlers;
mod routes;

pub use handlers::PreferencesState;
pub use routes::preferences_routes;
