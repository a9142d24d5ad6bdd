//! # Roster Service
//!
//! Business logic service layer for Roster Cloud. Its centerpiece is the
//! cache-consistency policy for the user collection: one cached snapshot
//! under a fixed key, read-through on misses, invalidated on every write.

pub mod cache;
pub mod user_service;

mod r#impl;

pub use cache::*;
pub use r#impl::*;
pub use user_service::*;
