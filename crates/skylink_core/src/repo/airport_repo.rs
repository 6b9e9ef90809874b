//! Airport repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `airports` table.
//! - Expose the reverse side of the airline/airport association.
//!
//! # Invariants
//! - Write paths call `Airport::validate()` before SQL mutations.
//! - Deleting an airport cascades to its `airline_airports` rows.

use super::schema::{ensure_connection_ready, parse_uuid, TableShape};
use super::{RepoError, RepoResult};
use crate::model::airline::AirlineId;
use crate::model::airport::{Airport, AirportId};
use crate::model::EntityKind;
use rusqlite::{params, Connection, Row};

const AIRPORT_SELECT_SQL: &str = "SELECT
    id,
    name,
    code,
    country,
    city
FROM airports";

const REQUIRED_TABLES: &[TableShape] = &[
    ("airports", &["id", "name", "code", "country", "city"]),
    ("airline_airports", &["airline_id", "airport_id"]),
];

/// Repository interface for airport records.
pub trait AirportRepository {
    fn create_airport(&self, airport: &Airport) -> RepoResult<AirportId>;
    fn update_airport(&self, airport: &Airport) -> RepoResult<()>;
    fn get_airport(&self, id: AirportId) -> RepoResult<Option<Airport>>;
    fn list_airports(&self) -> RepoResult<Vec<Airport>>;
    fn delete_airport(&self, id: AirportId) -> RepoResult<()>;
    /// Ids of airlines currently associated with the airport.
    fn list_airline_ids(&self, id: AirportId) -> RepoResult<Vec<AirlineId>>;

    fn airport_exists(&self, id: AirportId) -> RepoResult<bool> {
        Ok(self.get_airport(id)?.is_some())
    }
}

/// SQLite-backed airport repository.
pub struct SqliteAirportRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAirportRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl AirportRepository for SqliteAirportRepository<'_> {
    fn create_airport(&self, airport: &Airport) -> RepoResult<AirportId> {
        airport.validate()?;

        self.conn.execute(
            "INSERT INTO airports (id, name, code, country, city)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                airport.id.to_string(),
                airport.name.as_str(),
                airport.code.as_str(),
                airport.country.as_str(),
                airport.city.as_str(),
            ],
        )?;

        Ok(airport.id)
    }

    fn update_airport(&self, airport: &Airport) -> RepoResult<()> {
        airport.validate()?;

        let changed = self.conn.execute(
            "UPDATE airports
             SET
                name = ?1,
                code = ?2,
                country = ?3,
                city = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?5;",
            params![
                airport.name.as_str(),
                airport.code.as_str(),
                airport.country.as_str(),
                airport.city.as_str(),
                airport.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Airport,
                id: airport.id,
            });
        }

        Ok(())
    }

    fn get_airport(&self, id: AirportId) -> RepoResult<Option<Airport>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AIRPORT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_airport_row(row)?));
        }

        Ok(None)
    }

    fn list_airports(&self) -> RepoResult<Vec<Airport>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AIRPORT_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut airports = Vec::new();
        while let Some(row) = rows.next()? {
            airports.push(parse_airport_row(row)?);
        }
        Ok(airports)
    }

    fn delete_airport(&self, id: AirportId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM airports WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Airport,
                id,
            });
        }

        Ok(())
    }

    fn list_airline_ids(&self, id: AirportId) -> RepoResult<Vec<AirlineId>> {
        let mut stmt = self.conn.prepare(
            "SELECT airline_id
             FROM airline_airports
             WHERE airport_id = ?1
             ORDER BY airline_id ASC;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            ids.push(parse_uuid(&value, "airline_airports.airline_id")?);
        }
        Ok(ids)
    }

    fn airport_exists(&self, id: AirportId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM airports WHERE id = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

/// Decodes one row selected with the airport column list.
///
/// Rows that no longer satisfy `Airport::validate()` are reported as
/// `InvalidData` instead of being masked.
pub(crate) fn parse_airport_row(row: &Row<'_>) -> RepoResult<Airport> {
    let id_text: String = row.get("id")?;
    let airport = Airport {
        id: parse_uuid(&id_text, "airports.id")?,
        name: row.get("name")?,
        code: row.get("code")?,
        country: row.get("country")?,
        city: row.get("city")?,
    };
    airport
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("airport {id_text}: {err}")))?;
    Ok(airport)
}
