//! Postgres-backed store adapter.

mod user_repository;

pub use user_repository::PgUserRepository;
