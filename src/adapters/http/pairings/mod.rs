//! Pairing endpoints: generate and refine.

pub mod dto;
mod handlers;
mod routes;

pub use handlers::PairingsState;
pub use routes::pairings_routes;
