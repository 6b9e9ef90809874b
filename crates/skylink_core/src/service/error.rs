//! Business error taxonomy shared by catalog and association services.
//!
//! # Invariants
//! - Every variant maps to exactly one `ErrorKind`.
//! - `message()` is a fixed string per variant shape; ids travel in fields.

use crate::model::airline::{AirlineId, AirlineValidationError};
use crate::model::airport::{AirportId, AirportValidationError};
use crate::model::EntityKind;
use crate::repo::RepoError;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Coarse error class used to pick a transport status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    NotAssociated,
    PreconditionFailed,
    Internal,
}

impl ErrorKind {
    /// HTTP-style status code for this error class.
    pub fn status_code(self) -> u16 {
        match self {
            Self::NotFound | Self::NotAssociated => 404,
            Self::PreconditionFailed => 412,
            Self::Internal => 500,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::NotAssociated => "not_associated",
            Self::PreconditionFailed => "precondition_failed",
            Self::Internal => "internal",
        }
    }
}

/// Errors surfaced by service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Referenced airline or airport id does not resolve.
    NotFound { entity: EntityKind, id: Uuid },
    /// Both entities exist but are not linked.
    NotAssociated {
        airline_id: AirlineId,
        airport_id: AirportId,
    },
    /// Single-entity validation rule rejected the input.
    PreconditionFailed(String),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Write succeeded but read-back did not observe it.
    InconsistentState(&'static str),
}

impl ServiceError {
    pub fn not_found(entity: EntityKind, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NotAssociated { .. } => ErrorKind::NotAssociated,
            Self::PreconditionFailed(_) => ErrorKind::PreconditionFailed,
            Self::Repo(_) | Self::InconsistentState(_) => ErrorKind::Internal,
        }
    }

    /// Stable caller-facing message.
    pub fn message(&self) -> String {
        match self {
            Self::NotFound {
                entity: EntityKind::Airline,
                ..
            } => "The airline with the given id was not found".to_string(),
            Self::NotFound {
                entity: EntityKind::Airport,
                ..
            } => "The airport with the given id was not found".to_string(),
            Self::NotAssociated { .. } => {
                "The airport with the given id is not associated to the airline".to_string()
            }
            Self::PreconditionFailed(reason) => reason.clone(),
            Self::Repo(err) => format!("storage failure: {err}"),
            Self::InconsistentState(details) => format!("inconsistent catalog state: {details}"),
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            RepoError::InvalidAirport(err) => err.into(),
            RepoError::InvalidAirline(err) => err.into(),
            other => Self::Repo(other),
        }
    }
}

impl From<AirportValidationError> for ServiceError {
    fn from(value: AirportValidationError) -> Self {
        Self::PreconditionFailed(value.to_string())
    }
}

impl From<AirlineValidationError> for ServiceError {
    fn from(value: AirlineValidationError) -> Self {
        Self::PreconditionFailed(value.to_string())
    }
}

/// Logical association endpoints exposed to transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AddAssociation,
    GetAssociation,
    ListAssociations,
    ReplaceAssociations,
    RemoveAssociation,
}

impl Operation {
    /// Status returned when the operation succeeds.
    pub fn success_status(self) -> u16 {
        match self {
            Self::AddAssociation => 201,
            Self::GetAssociation | Self::ListAssociations | Self::ReplaceAssociations => 200,
            Self::RemoveAssociation => 204,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddAssociation => "association_add",
            Self::GetAssociation => "association_get",
            Self::ListAssociations => "association_list",
            Self::ReplaceAssociations => "association_replace",
            Self::RemoveAssociation => "association_remove",
        }
    }
}
