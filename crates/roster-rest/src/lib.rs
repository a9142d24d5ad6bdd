//! # Roster REST
//!
//! REST API layer using Axum for Roster Cloud.
//! Provides HTTP endpoints for the user collection and health checks.

pub mod controllers;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
