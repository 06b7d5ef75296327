//! Application layer - the orchestration core.

mod service;
pub mod validator;

pub use service::{
    GeneratePairingsInput, PairingOutcome, PairingService, RefinePairingsInput,
};
