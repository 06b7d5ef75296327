//! Domain layer - value objects and the pairing error taxonomy.
//!
//! No I/O lives here. Values are normalized at construction so the rest of
//! the system can rely on their invariants.

mod errors;
mod pairing;
mod preferences;

pub use errors::PairingError;
pub use pairing::{
    ImageDocument, PairingSet, PriceIndicator, Recommendation, SessionId, QUICK_REFINEMENTS,
};
pub(crate) use pairing::coerce_rank;
pub use preferences::{PreferenceProfile, PriceSensitivity};
