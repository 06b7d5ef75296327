//! HTTP adapters - the REST surface consumed by the mobile web client.
//!
//! Failures never surface as bare 5xx pages: every operation answers with
//! the uniform `{success, error}` envelope the client renders.

pub mod pairings;
pub mod preferences;

pub use pairings::{pairings_routes, PairingsState};
pub use preferences::{preferences_routes, PreferencesState};

/// v1 runs without authentication: every request acts on behalf of the
/// single default user, as the original deployment did.
pub(crate) const DEFAULT_USER_ID: uuid::Uuid =
    uuid::Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001);
