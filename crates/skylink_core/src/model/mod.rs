//! Catalog domain model for airlines, airports and their association.
//!
//! # Responsibility
//! - Define canonical records used by repositories and services.
//! - Own single-entity validation rules.
//!
//! # Invariants
//! - Every record is identified by a stable UUID that is never reused.
//! - The airline is the owning side of the airline/airport association.

pub mod airline;
pub mod airport;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Entity discriminator used by not-found errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Airline,
    Airport,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Airline => "airline",
            Self::Airport => "airport",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the current wall clock as Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
