//! Data access layer
//!
//! Provides the user store contract and its implementations.

pub mod user;

pub use user::{InMemoryUserDataSource, PgUserDataSource, StoreError, User, UserDataSource};
