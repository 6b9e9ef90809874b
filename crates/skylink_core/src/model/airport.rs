//! Airport domain model.
//!
//! # Invariants
//! - `code` has exactly three characters.
//! - `name`, `code`, `country` and `city` are never blank.

use super::airline::Airline;
use super::is_blank;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of an airport record.
pub type AirportId = Uuid;

/// Required length of an airport code, in characters.
pub const AIRPORT_CODE_LEN: usize = 3;

/// Canonical airport record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    pub id: AirportId,
    /// Display name, e.g. `Hartsfield-Jackson Atlanta International`.
    pub name: String,
    /// Three-character code, e.g. `ATL`.
    pub code: String,
    pub country: String,
    pub city: String,
}

/// Airport record joined with the airlines serving it.
///
/// Airlines are carried without their own airport sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AirportWithAirlines {
    #[serde(flatten)]
    pub airport: Airport,
    pub airlines: Vec<Airline>,
}

/// Caller-supplied fields for airport create/update paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAirport {
    pub name: String,
    pub code: String,
    pub country: String,
    pub city: String,
}

/// Validation failure for airport fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AirportValidationError {
    /// A required text field is empty or whitespace only.
    EmptyField(&'static str),
    /// `code` is not exactly three characters long.
    InvalidCodeLength { actual: usize },
}

impl Display for AirportValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "airport {field} must not be empty"),
            Self::InvalidCodeLength { .. } => {
                write!(f, "The airport code must have exactly 3 characters")
            }
        }
    }
}

impl Error for AirportValidationError {}

impl Airport {
    /// Builds an airport with a freshly generated id.
    pub fn new(input: NewAirport) -> Result<Self, AirportValidationError> {
        Self::with_id(Uuid::new_v4(), input)
    }

    /// Builds an airport with a caller-provided id.
    ///
    /// Used by update paths where identity already exists.
    pub fn with_id(id: AirportId, input: NewAirport) -> Result<Self, AirportValidationError> {
        let airport = Self {
            id,
            name: input.name,
            code: input.code,
            country: input.country,
            city: input.city,
        };
        airport.validate()?;
        Ok(airport)
    }

    /// Checks field-level invariants.
    pub fn validate(&self) -> Result<(), AirportValidationError> {
        for (field, value) in [
            ("name", &self.name),
            ("code", &self.code),
            ("country", &self.country),
            ("city", &self.city),
        ] {
            if is_blank(value) {
                return Err(AirportValidationError::EmptyField(field));
            }
        }

        let actual = self.code.chars().count();
        if actual != AIRPORT_CODE_LEN {
            return Err(AirportValidationError::InvalidCodeLength { actual });
        }

        Ok(())
    }
}
