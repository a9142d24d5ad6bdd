//! # Roster Repository
//!
//! Store adapter for Roster Cloud: CRUD against the persistent user
//! document collection, backed by Postgres with a JSONB document column.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn UserRepository>   (store adapter interface)
//! PgUserRepository               (SQLx / Postgres, JSONB documents)
//!   ↓
//! Postgres
//! ```

pub mod pool;
pub mod postgres;
pub mod traits;

pub use pool::*;
pub use postgres::*;
pub use traits::*;
