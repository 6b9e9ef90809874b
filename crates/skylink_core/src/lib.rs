//! Core domain logic for the SkyLink airline catalog.
//! This crate owns the airline/airport association rules.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::airline::{Airline, AirlineId, AirlineValidationError, NewAirline};
pub use model::airport::{
    Airport, AirportId, AirportValidationError, AirportWithAirlines, NewAirport,
};
pub use model::EntityKind;
pub use repo::airline_repo::{AirlineRepository, SqliteAirlineRepository};
pub use repo::airport_repo::{AirportRepository, SqliteAirportRepository};
pub use repo::{RepoError, RepoResult};
pub use service::airline_service::AirlineService;
pub use service::airport_service::AirportService;
pub use service::association_service::AssociationService;
pub use service::error::{ErrorKind, Operation, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
