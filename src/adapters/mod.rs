//! Adapters - implementations of the ports against real collaborators,
//! plus the HTTP surface and in-memory test doubles.

pub mod ai;
pub mod http;
pub mod preferences;
pub mod storage;
