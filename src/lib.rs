//! Plate & Grape - Food and Wine Pairing Backend
//!
//! This crate turns captured menu and wine-list photographs plus a user
//! preference profile into a validated, ranked list of exactly three
//! food/wine pairings, with a conversational refinement loop on top of the
//! same image evidence.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
