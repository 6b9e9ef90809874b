//! Airline catalog use-case service.
//!
//! # Responsibility
//! - Provide create/find/update/delete entry points for airline records.
//! - Read airlines with their airport sets loaded.
//!
//! # Invariants
//! - Field updates never change the airline's airport set; only the
//!   association service mutates it.

use crate::model::airline::{Airline, AirlineId, NewAirline};
use crate::model::EntityKind;
use crate::repo::airline_repo::AirlineRepository;
use crate::service::error::{ServiceError, ServiceResult};

/// Use-case service wrapper for airline records.
pub struct AirlineService<R: AirlineRepository> {
    repo: R,
}

impl<R: AirlineRepository> AirlineService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores a new airline with an empty airport set.
    pub fn create(&self, input: NewAirline) -> ServiceResult<Airline> {
        let airline = Airline::new(input)?;
        let id = self.repo.create_airline(&airline)?;
        self.repo
            .get_airline(id, true)?
            .ok_or(ServiceError::InconsistentState(
                "created airline not found in read-back",
            ))
    }

    pub fn find_one(&self, id: AirlineId) -> ServiceResult<Airline> {
        self.repo
            .get_airline(id, true)?
            .ok_or(ServiceError::not_found(EntityKind::Airline, id))
    }

    pub fn find_all(&self) -> ServiceResult<Vec<Airline>> {
        Ok(self.repo.list_airlines(true)?)
    }

    /// Replaces the airline's own fields.
    pub fn update(&self, id: AirlineId, input: NewAirline) -> ServiceResult<Airline> {
        if !self.repo.airline_exists(id)? {
            return Err(ServiceError::not_found(EntityKind::Airline, id));
        }
        let airline = Airline::with_id(id, input)?;
        self.repo.update_airline(&airline)?;
        self.find_one(id)
    }

    /// Deletes an airline; its associations are removed with it.
    pub fn delete(&self, id: AirlineId) -> ServiceResult<()> {
        self.repo.delete_airline(id)?;
        Ok(())
    }
}
