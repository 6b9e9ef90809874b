//! Airport catalog use-case service.
//!
//! # Responsibility
//! - Provide create/find/update/delete entry points for airport records.
//! - Translate absent lookups into `ServiceError::NotFound`.

use crate::model::airline::AirlineId;
use crate::model::airport::{Airport, AirportId, NewAirport};
use crate::model::EntityKind;
use crate::repo::airport_repo::AirportRepository;
use crate::service::error::{ServiceError, ServiceResult};

/// Use-case service wrapper for airport records.
pub struct AirportService<R: AirportRepository> {
    repo: R,
}

impl<R: AirportRepository> AirportService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores a new airport, returning the persisted record.
    pub fn create(&self, input: NewAirport) -> ServiceResult<Airport> {
        let airport = Airport::new(input)?;
        let id = self.repo.create_airport(&airport)?;
        self.repo
            .get_airport(id)?
            .ok_or(ServiceError::InconsistentState(
                "created airport not found in read-back",
            ))
    }

    pub fn find_one(&self, id: AirportId) -> ServiceResult<Airport> {
        self.repo
            .get_airport(id)?
            .ok_or(ServiceError::not_found(EntityKind::Airport, id))
    }

    pub fn find_all(&self) -> ServiceResult<Vec<Airport>> {
        Ok(self.repo.list_airports()?)
    }

    /// Replaces all fields of an existing airport.
    ///
    /// Existence is checked before validation, so an unknown id reports
    /// NotFound even when the input is also invalid.
    pub fn update(&self, id: AirportId, input: NewAirport) -> ServiceResult<Airport> {
        if !self.repo.airport_exists(id)? {
            return Err(ServiceError::not_found(EntityKind::Airport, id));
        }
        let airport = Airport::with_id(id, input)?;
        self.repo.update_airport(&airport)?;
        self.find_one(id)
    }

    /// Deletes an airport; its associations are removed with it.
    pub fn delete(&self, id: AirportId) -> ServiceResult<()> {
        self.repo.delete_airport(id)?;
        Ok(())
    }

    /// Lists the ids of airlines serving the airport.
    pub fn find_airlines_of_airport(&self, id: AirportId) -> ServiceResult<Vec<AirlineId>> {
        if !self.repo.airport_exists(id)? {
            return Err(ServiceError::not_found(EntityKind::Airport, id));
        }
        Ok(self.repo.list_airline_ids(id)?)
    }
}
