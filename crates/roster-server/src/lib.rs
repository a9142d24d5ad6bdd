//! # Roster Server
//!
//! Server composition for Roster Cloud: configuration loading, dependency
//! wiring, and the HTTP entry point.

pub mod di;
pub mod startup;
