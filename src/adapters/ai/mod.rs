//! AI adapters - prompt contract and PairingProvider implementations.

mod anthropic;
mod mock;
pub mod prompt;

pub use anthropic::{AnthropicConfig, AnthropicProvider};
pub use mock::{MockPairingProvider, RecordedCall};
