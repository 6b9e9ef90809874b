//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for the catalog.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths validate records before any SQL mutation.
//! - Lookups return `Option`; only mutations of missing rows fail with
//!   `RepoError::NotFound`.

pub mod airline_repo;
pub mod airport_repo;
mod schema;

pub use schema::{RepoError, RepoResult};
