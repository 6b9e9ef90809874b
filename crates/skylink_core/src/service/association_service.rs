//! Airline/airport association use-case service.
//!
//! # Responsibility
//! - Add, get, list, replace and remove links between one airline and the
//!   airports it serves.
//! - Enforce referential integrity before any link is written.
//! - Read the reverse side: each airport with the airlines serving it.
//!
//! # Invariants
//! - Existence checks run before membership checks, and the airline is
//!   always resolved before any airport.
//! - Every mutating call ends in at most one `set_airline_airports` write,
//!   issued only after every referenced airport resolved.
//! - The airport set has set semantics: a pair is stored at most once.
//!
//! Concurrent mutations of the same airline are last-write-wins; the read
//! of the current set and the final write are not isolated from each other.

use crate::model::airline::{Airline, AirlineId};
use crate::model::airport::{Airport, AirportId, AirportWithAirlines};
use crate::model::EntityKind;
use crate::repo::airline_repo::AirlineRepository;
use crate::repo::airport_repo::AirportRepository;
use crate::service::error::{Operation, ServiceError, ServiceResult};
use log::{debug, info, warn};
use std::collections::HashSet;

/// Association service over injected airline and airport repositories.
pub struct AssociationService<A: AirlineRepository, P: AirportRepository> {
    airlines: A,
    airports: P,
}

impl<A: AirlineRepository, P: AirportRepository> AssociationService<A, P> {
    /// Creates a service using the provided repository implementations.
    pub fn new(airlines: A, airports: P) -> Self {
        Self { airlines, airports }
    }

    /// Links one existing airport to one existing airline.
    ///
    /// Returns the airline with its full updated airport set. Linking an
    /// airport that is already a member succeeds without writing.
    pub fn add_airport_to_airline(
        &self,
        airline_id: AirlineId,
        airport_id: AirportId,
    ) -> ServiceResult<Airline> {
        observe(
            Operation::AddAssociation,
            airline_id,
            self.try_add(airline_id, airport_id),
        )
    }

    /// Returns the airport record when it is linked to the airline.
    pub fn find_airport_from_airline(
        &self,
        airline_id: AirlineId,
        airport_id: AirportId,
    ) -> ServiceResult<Airport> {
        observe(
            Operation::GetAssociation,
            airline_id,
            self.try_find(airline_id, airport_id),
        )
    }

    /// Returns all airports linked to the airline in persisted order.
    pub fn find_airports_from_airline(&self, airline_id: AirlineId) -> ServiceResult<Vec<Airport>> {
        let result = self
            .resolve_airline(airline_id, true)
            .map(|airline| airline.airports);
        observe(Operation::ListAssociations, airline_id, result)
    }

    /// Replaces the airline's whole airport set with `airport_ids`.
    ///
    /// Every id is resolved before anything is written; the first unknown id
    /// fails the call and leaves the stored set untouched. Repeated ids link
    /// once, at the position of their first occurrence.
    pub fn update_airports_from_airline(
        &self,
        airline_id: AirlineId,
        airport_ids: &[AirportId],
    ) -> ServiceResult<Airline> {
        observe(
            Operation::ReplaceAssociations,
            airline_id,
            self.try_replace(airline_id, airport_ids),
        )
    }

    /// Unlinks one airport from the airline; neither record is deleted.
    pub fn delete_airport_from_airline(
        &self,
        airline_id: AirlineId,
        airport_id: AirportId,
    ) -> ServiceResult<()> {
        observe(
            Operation::RemoveAssociation,
            airline_id,
            self.try_remove(airline_id, airport_id),
        )
    }

    /// Returns the airport together with every airline serving it.
    pub fn find_airport_with_airlines(
        &self,
        airport_id: AirportId,
    ) -> ServiceResult<AirportWithAirlines> {
        let airport = self.resolve_airport(airport_id)?;
        let joined = self.join_airlines(airport)?;
        debug!(
            "event=airport_airlines module=service status=ok airport_id={airport_id} airlines={}",
            joined.airlines.len()
        );
        Ok(joined)
    }

    /// Lists every airport together with the airlines serving it.
    pub fn find_airports_with_airlines(&self) -> ServiceResult<Vec<AirportWithAirlines>> {
        let joined = self
            .airports
            .list_airports()?
            .into_iter()
            .map(|airport| self.join_airlines(airport))
            .collect::<ServiceResult<Vec<_>>>()?;
        debug!(
            "event=airport_airlines module=service status=ok airports={}",
            joined.len()
        );
        Ok(joined)
    }

    fn join_airlines(&self, airport: Airport) -> ServiceResult<AirportWithAirlines> {
        let mut airlines = Vec::new();
        for airline_id in self.airports.list_airline_ids(airport.id)? {
            let airline = self.airlines.get_airline(airline_id, false)?.ok_or(
                ServiceError::InconsistentState("linked airline missing from catalog"),
            )?;
            airlines.push(airline);
        }
        Ok(AirportWithAirlines { airport, airlines })
    }

    fn try_add(&self, airline_id: AirlineId, airport_id: AirportId) -> ServiceResult<Airline> {
        let airline = self.resolve_airline(airline_id, true)?;
        let airport = self.resolve_airport(airport_id)?;
        if airline.serves(airport.id) {
            debug!(
                "event=association_add module=service status=noop airline_id={airline_id} airport_id={airport_id}"
            );
            return Ok(airline);
        }

        let mut airport_ids = airport_ids_of(&airline);
        airport_ids.push(airport.id);
        self.airlines.set_airline_airports(airline_id, &airport_ids)?;
        self.reload(airline_id)
    }

    fn try_find(&self, airline_id: AirlineId, airport_id: AirportId) -> ServiceResult<Airport> {
        let airline = self.resolve_airline(airline_id, true)?;
        let airport = self.resolve_airport(airport_id)?;
        airline
            .airports
            .into_iter()
            .find(|member| member.id == airport.id)
            .ok_or(ServiceError::NotAssociated {
                airline_id,
                airport_id,
            })
    }

    fn try_replace(
        &self,
        airline_id: AirlineId,
        airport_ids: &[AirportId],
    ) -> ServiceResult<Airline> {
        self.resolve_airline(airline_id, false)?;

        let mut seen = HashSet::with_capacity(airport_ids.len());
        let mut resolved = Vec::with_capacity(airport_ids.len());
        for &airport_id in airport_ids {
            let airport = self.resolve_airport(airport_id)?;
            if seen.insert(airport.id) {
                resolved.push(airport.id);
            }
        }

        self.airlines.set_airline_airports(airline_id, &resolved)?;
        self.reload(airline_id)
    }

    fn try_remove(&self, airline_id: AirlineId, airport_id: AirportId) -> ServiceResult<()> {
        let airline = self.resolve_airline(airline_id, true)?;
        let airport = self.resolve_airport(airport_id)?;
        if !airline.serves(airport.id) {
            return Err(ServiceError::NotAssociated {
                airline_id,
                airport_id,
            });
        }

        let remaining: Vec<AirportId> = airport_ids_of(&airline)
            .into_iter()
            .filter(|id| *id != airport.id)
            .collect();
        self.airlines.set_airline_airports(airline_id, &remaining)?;
        Ok(())
    }

    fn resolve_airline(&self, id: AirlineId, with_airports: bool) -> ServiceResult<Airline> {
        match self.airlines.get_airline(id, with_airports)? {
            Some(airline) => Ok(airline),
            None => Err(ServiceError::not_found(EntityKind::Airline, id)),
        }
    }

    fn resolve_airport(&self, id: AirportId) -> ServiceResult<Airport> {
        match self.airports.get_airport(id)? {
            Some(airport) => Ok(airport),
            None => Err(ServiceError::not_found(EntityKind::Airport, id)),
        }
    }

    fn reload(&self, id: AirlineId) -> ServiceResult<Airline> {
        self.airlines
            .get_airline(id, true)?
            .ok_or(ServiceError::InconsistentState(
                "airline missing after airport set write",
            ))
    }
}

fn airport_ids_of(airline: &Airline) -> Vec<AirportId> {
    airline.airports.iter().map(|airport| airport.id).collect()
}

fn observe<T>(
    operation: Operation,
    airline_id: AirlineId,
    result: ServiceResult<T>,
) -> ServiceResult<T> {
    match &result {
        Ok(_) => match operation {
            Operation::GetAssociation | Operation::ListAssociations => debug!(
                "event={} module=service status=ok airline_id={airline_id}",
                operation.as_str()
            ),
            _ => info!(
                "event={} module=service status=ok airline_id={airline_id}",
                operation.as_str()
            ),
        },
        Err(err) => warn!(
            "event={} module=service status=rejected airline_id={airline_id} error_kind={}",
            operation.as_str(),
            err.kind().as_str()
        ),
    }
    result
}
