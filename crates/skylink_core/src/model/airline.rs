//! Airline domain model.
//!
//! # Invariants
//! - `founded_at` is strictly earlier than the time of create/update.
//! - `airports` never holds the same airport twice.
//! - `airports` is only populated when the airline was read with its
//!   associations loaded.

use super::airport::{Airport, AirportId};
use super::{is_blank, now_epoch_ms};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of an airline record.
pub type AirlineId = Uuid;

/// Canonical airline record, optionally carrying its associated airports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airline {
    pub id: AirlineId,
    pub name: String,
    pub description: String,
    /// Founding date as Unix epoch milliseconds.
    pub founded_at: i64,
    pub website: String,
    /// Associated airports in persisted order.
    #[serde(default)]
    pub airports: Vec<Airport>,
}

/// Caller-supplied fields for airline create/update paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAirline {
    pub name: String,
    pub description: String,
    pub founded_at: i64,
    pub website: String,
}

/// Validation failure for airline fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AirlineValidationError {
    /// A required text field is empty or whitespace only.
    EmptyField(&'static str),
    /// `founded_at` is not strictly before the validation instant.
    FoundedNotInPast { founded_at: i64, now: i64 },
}

impl Display for AirlineValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "airline {field} must not be empty"),
            Self::FoundedNotInPast { .. } => {
                write!(f, "The founding date must be earlier than the current date")
            }
        }
    }
}

impl Error for AirlineValidationError {}

impl Airline {
    /// Builds an airline with a freshly generated id and no airports.
    pub fn new(input: NewAirline) -> Result<Self, AirlineValidationError> {
        Self::with_id(Uuid::new_v4(), input)
    }

    /// Builds an airline with a caller-provided id and no airports.
    pub fn with_id(id: AirlineId, input: NewAirline) -> Result<Self, AirlineValidationError> {
        let airline = Self {
            id,
            name: input.name,
            description: input.description,
            founded_at: input.founded_at,
            website: input.website,
            airports: Vec::new(),
        };
        airline.validate()?;
        Ok(airline)
    }

    /// Checks field-level invariants against the current clock.
    pub fn validate(&self) -> Result<(), AirlineValidationError> {
        self.validate_at(now_epoch_ms())
    }

    /// Checks field-level invariants against an explicit instant.
    pub fn validate_at(&self, now: i64) -> Result<(), AirlineValidationError> {
        for (field, value) in [
            ("name", &self.name),
            ("description", &self.description),
            ("website", &self.website),
        ] {
            if is_blank(value) {
                return Err(AirlineValidationError::EmptyField(field));
            }
        }

        if self.founded_at >= now {
            return Err(AirlineValidationError::FoundedNotInPast {
                founded_at: self.founded_at,
                now,
            });
        }

        Ok(())
    }

    /// Returns whether `airport_id` is in the loaded airport set.
    pub fn serves(&self, airport_id: AirportId) -> bool {
        self.airports.iter().any(|airport| airport.id == airport_id)
    }
}
