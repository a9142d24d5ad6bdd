//! # Roster Core
//!
//! Core types, documents, and error definitions for Roster Cloud.
//! This crate provides the foundational abstractions shared by the
//! repository, service, and REST layers.

pub mod document;
pub mod error;
pub mod id;
pub mod result;

pub use document::*;
pub use error::*;
pub use id::*;
pub use result::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
