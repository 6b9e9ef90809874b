//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Map absent lookups and validation failures onto `ServiceError`.

pub mod airline_service;
pub mod airport_service;
pub mod association_service;
pub mod error;
