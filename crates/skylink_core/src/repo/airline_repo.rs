//! Airline repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `airlines` table.
//! - Own persistence of each airline's associated-airport set.
//!
//! # Invariants
//! - An airline's airport set is always written as a whole, inside one
//!   `IMMEDIATE` transaction, and each pair is stored at most once.
//! - Airport order follows the persisted `position` column.
//! - Links are only written after both endpoints are confirmed to exist
//!   within the same transaction.

use super::airport_repo::parse_airport_row;
use super::schema::{ensure_connection_ready, parse_uuid, TableShape};
use super::{RepoError, RepoResult};
use crate::model::airline::{Airline, AirlineId};
use crate::model::airport::{Airport, AirportId};
use crate::model::EntityKind;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const AIRLINE_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    founded_at,
    website
FROM airlines";

const REQUIRED_TABLES: &[TableShape] = &[
    (
        "airlines",
        &["id", "name", "description", "founded_at", "website"],
    ),
    ("airports", &["id", "name", "code", "country", "city"]),
    ("airline_airports", &["airline_id", "airport_id", "position"]),
];

/// Repository interface for airline records and their airport sets.
pub trait AirlineRepository {
    /// Inserts the airline together with its current `airports` set.
    fn create_airline(&self, airline: &Airline) -> RepoResult<AirlineId>;
    /// Updates the airline's own fields; the airport set is left untouched.
    fn update_airline(&self, airline: &Airline) -> RepoResult<()>;
    /// Looks up one airline, loading its airport set when `with_airports`.
    fn get_airline(&self, id: AirlineId, with_airports: bool) -> RepoResult<Option<Airline>>;
    fn list_airlines(&self, with_airports: bool) -> RepoResult<Vec<Airline>>;
    fn delete_airline(&self, id: AirlineId) -> RepoResult<()>;
    /// Replaces the full airport set of one airline atomically.
    fn set_airline_airports(&self, id: AirlineId, airport_ids: &[AirportId]) -> RepoResult<()>;

    fn airline_exists(&self, id: AirlineId) -> RepoResult<bool> {
        Ok(self.get_airline(id, false)?.is_some())
    }
}

/// SQLite-backed airline repository.
pub struct SqliteAirlineRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAirlineRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }

    fn begin(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

impl AirlineRepository for SqliteAirlineRepository<'_> {
    fn create_airline(&self, airline: &Airline) -> RepoResult<AirlineId> {
        airline.validate()?;

        let tx = self.begin()?;
        tx.execute(
            "INSERT INTO airlines (id, name, description, founded_at, website)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                airline.id.to_string(),
                airline.name.as_str(),
                airline.description.as_str(),
                airline.founded_at,
                airline.website.as_str(),
            ],
        )?;
        let airport_ids: Vec<AirportId> = airline.airports.iter().map(|a| a.id).collect();
        replace_links_in_tx(&tx, airline.id, &airport_ids)?;
        tx.commit()?;

        Ok(airline.id)
    }

    fn update_airline(&self, airline: &Airline) -> RepoResult<()> {
        airline.validate()?;

        let changed = self.conn.execute(
            "UPDATE airlines
             SET
                name = ?1,
                description = ?2,
                founded_at = ?3,
                website = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?5;",
            params![
                airline.name.as_str(),
                airline.description.as_str(),
                airline.founded_at,
                airline.website.as_str(),
                airline.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Airline,
                id: airline.id,
            });
        }

        Ok(())
    }

    fn get_airline(&self, id: AirlineId, with_airports: bool) -> RepoResult<Option<Airline>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AIRLINE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let mut airline = parse_airline_row(row)?;
        if with_airports {
            airline.airports = load_airports_for_airline(self.conn, airline.id)?;
        }
        Ok(Some(airline))
    }

    fn list_airlines(&self, with_airports: bool) -> RepoResult<Vec<Airline>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AIRLINE_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut airlines = Vec::new();
        while let Some(row) = rows.next()? {
            let mut airline = parse_airline_row(row)?;
            if with_airports {
                airline.airports = load_airports_for_airline(self.conn, airline.id)?;
            }
            airlines.push(airline);
        }
        Ok(airlines)
    }

    fn delete_airline(&self, id: AirlineId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM airlines WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Airline,
                id,
            });
        }

        Ok(())
    }

    fn set_airline_airports(&self, id: AirlineId, airport_ids: &[AirportId]) -> RepoResult<()> {
        let tx = self.begin()?;
        if !exists_in_tx(&tx, "airlines", id)? {
            return Err(RepoError::NotFound {
                entity: EntityKind::Airline,
                id,
            });
        }

        replace_links_in_tx(&tx, id, airport_ids)?;
        tx.execute(
            "UPDATE airlines
             SET updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            [id.to_string()],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn airline_exists(&self, id: AirlineId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM airlines WHERE id = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

// Dropping `tx` without commit rolls back every link written here.
fn replace_links_in_tx(
    tx: &Transaction<'_>,
    airline_id: AirlineId,
    airport_ids: &[AirportId],
) -> RepoResult<()> {
    let airline_text = airline_id.to_string();
    tx.execute(
        "DELETE FROM airline_airports WHERE airline_id = ?1;",
        [airline_text.as_str()],
    )?;

    let mut position: i64 = 0;
    for airport_id in airport_ids {
        if !exists_in_tx(tx, "airports", *airport_id)? {
            return Err(RepoError::NotFound {
                entity: EntityKind::Airport,
                id: *airport_id,
            });
        }

        let inserted = tx.execute(
            "INSERT OR IGNORE INTO airline_airports (airline_id, airport_id, position)
             VALUES (?1, ?2, ?3);",
            params![airline_text.as_str(), airport_id.to_string(), position],
        )?;
        if inserted > 0 {
            position += 1;
        }
    }

    Ok(())
}

fn exists_in_tx(tx: &Transaction<'_>, table: &'static str, id: uuid::Uuid) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
        [id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn load_airports_for_airline(conn: &Connection, airline_id: AirlineId) -> RepoResult<Vec<Airport>> {
    let mut stmt = conn.prepare(
        "SELECT
            a.id,
            a.name,
            a.code,
            a.country,
            a.city
         FROM airline_airports aa
         INNER JOIN airports a ON a.id = aa.airport_id
         WHERE aa.airline_id = ?1
         ORDER BY aa.position ASC;",
    )?;
    let mut rows = stmt.query([airline_id.to_string()])?;
    let mut airports = Vec::new();
    while let Some(row) = rows.next()? {
        airports.push(parse_airport_row(row)?);
    }
    Ok(airports)
}

fn parse_airline_row(row: &Row<'_>) -> RepoResult<Airline> {
    let id_text: String = row.get("id")?;
    Ok(Airline {
        id: parse_uuid(&id_text, "airlines.id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        founded_at: row.get("founded_at")?,
        website: row.get("website")?,
        airports: Vec::new(),
    })
}
