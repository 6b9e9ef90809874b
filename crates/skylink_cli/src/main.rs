//! Command-line entry point for the SkyLink catalog.
//!
//! # Responsibility
//! - Map each catalog and association operation to a subcommand.
//! - Print results as JSON and errors with their status class.

use chrono::{DateTime, NaiveDate};
use clap::{Args, Parser, Subcommand};
use log::info;
use serde::Serialize;
use skylink_core::db::open_db;
use skylink_core::{
    default_log_level, init_logging, AirlineService, AirportService, AssociationService,
    NewAirline, NewAirport, Operation, ServiceError, SqliteAirlineRepository,
    SqliteAirportRepository,
};
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

const DEFAULT_DB_FILE_NAME: &str = "skylink.sqlite3";

#[derive(Debug, Parser)]
#[command(name = "skylink", version, about = "Airline and airport catalog")]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "SKYLINK_DB_PATH", global = true)]
    db: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long, env = "SKYLINK_LOG_LEVEL", global = true)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, env = "SKYLINK_LOG_DIR", global = true)]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Airport catalog operations.
    #[command(subcommand)]
    Airport(AirportCommand),
    /// Airline catalog operations.
    #[command(subcommand)]
    Airline(AirlineCommand),
    /// Links between an airline and the airports it serves.
    #[command(subcommand)]
    Association(AssociationCommand),
}

#[derive(Debug, Subcommand)]
enum AirportCommand {
    Create(AirportFields),
    Get {
        id: Uuid,
        /// Include the airlines serving the airport.
        #[arg(long)]
        with_airlines: bool,
    },
    List {
        /// Include the airlines serving each airport.
        #[arg(long)]
        with_airlines: bool,
    },
    Update {
        id: Uuid,
        #[command(flatten)]
        fields: AirportFields,
    },
    Delete { id: Uuid },
    /// Ids of the airlines serving an airport.
    Airlines { id: Uuid },
}

#[derive(Debug, Subcommand)]
enum AirlineCommand {
    Create(AirlineFields),
    Get { id: Uuid },
    List,
    Update {
        id: Uuid,
        #[command(flatten)]
        fields: AirlineFields,
    },
    Delete { id: Uuid },
}

#[derive(Debug, Subcommand)]
enum AssociationCommand {
    Add { airline_id: Uuid, airport_id: Uuid },
    Get { airline_id: Uuid, airport_id: Uuid },
    List { airline_id: Uuid },
    /// Replace the whole airport set of an airline.
    Replace {
        airline_id: Uuid,
        airport_ids: Vec<Uuid>,
    },
    Remove { airline_id: Uuid, airport_id: Uuid },
}

#[derive(Debug, Args)]
struct AirportFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    code: String,
    #[arg(long)]
    country: String,
    #[arg(long)]
    city: String,
}

#[derive(Debug, Args)]
struct AirlineFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: String,
    /// Founding date: `YYYY-MM-DD`, RFC 3339, or Unix epoch milliseconds.
    #[arg(long, allow_negative_numbers = true, value_parser = parse_founded_at)]
    founded_at: i64,
    #[arg(long)]
    website: String,
}

impl From<AirportFields> for NewAirport {
    fn from(fields: AirportFields) -> Self {
        Self {
            name: fields.name,
            code: fields.code,
            country: fields.country,
            city: fields.city,
        }
    }
}

impl From<AirlineFields> for NewAirline {
    fn from(fields: AirlineFields) -> Self {
        Self {
            name: fields.name,
            description: fields.description,
            founded_at: fields.founded_at,
            website: fields.website,
        }
    }
}

/// Parses a founding date into Unix epoch milliseconds.
///
/// Bare dates are taken as midnight UTC.
fn parse_founded_at(value: &str) -> Result<i64, String> {
    let value = value.trim();
    if let Ok(millis) = value.parse::<i64>() {
        return Ok(millis);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| format!("`{value}` has no midnight"))?;
        return Ok(midnight.and_utc().timestamp_millis());
    }
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.timestamp_millis())
        .map_err(|_| {
            format!("`{value}` is not a date (YYYY-MM-DD), an RFC 3339 timestamp or epoch millis")
        })
}

/// Failure reported to the terminal with its status class.
enum CliError {
    Setup(String),
    Service(ServiceError),
}

impl From<ServiceError> for CliError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Setup(message)) => {
            eprintln!("error: {message}");
            ExitCode::from(2)
        }
        Err(CliError::Service(err)) => {
            eprintln!("error: {} (status {})", err, err.kind().status_code());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).map_err(|err| CliError::Setup(err.to_string()))?;
    }

    let db_path = cli
        .db
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
    let conn = open_db(&db_path)
        .map_err(|err| CliError::Setup(format!("cannot open `{}`: {err}", db_path.display())))?;
    let airlines = SqliteAirlineRepository::try_new(&conn)
        .map_err(|err| CliError::Setup(err.to_string()))?;
    let airports = SqliteAirportRepository::try_new(&conn)
        .map_err(|err| CliError::Setup(err.to_string()))?;

    match cli.command {
        Command::Airport(command) => {
            let joined = SqliteAirportRepository::try_new(&conn)
                .map(|reader| AssociationService::new(airlines, reader))
                .map_err(|err| CliError::Setup(err.to_string()))?;
            run_airport(AirportService::new(airports), joined, command)
        }
        Command::Airline(command) => run_airline(AirlineService::new(airlines), command),
        Command::Association(command) => {
            run_association(AssociationService::new(airlines, airports), command)
        }
    }
}

fn run_airport(
    service: AirportService<SqliteAirportRepository<'_>>,
    joined: AssociationService<SqliteAirlineRepository<'_>, SqliteAirportRepository<'_>>,
    command: AirportCommand,
) -> Result<(), CliError> {
    match command {
        AirportCommand::Create(fields) => print_json(&service.create(fields.into())?),
        AirportCommand::Get {
            id,
            with_airlines: true,
        } => print_json(&joined.find_airport_with_airlines(id)?),
        AirportCommand::Get { id, .. } => print_json(&service.find_one(id)?),
        AirportCommand::List {
            with_airlines: true,
        } => print_json(&joined.find_airports_with_airlines()?),
        AirportCommand::List { .. } => print_json(&service.find_all()?),
        AirportCommand::Update { id, fields } => print_json(&service.update(id, fields.into())?),
        AirportCommand::Delete { id } => {
            service.delete(id)?;
            Ok(())
        }
        AirportCommand::Airlines { id } => print_json(&service.find_airlines_of_airport(id)?),
    }
}

fn run_airline(
    service: AirlineService<SqliteAirlineRepository<'_>>,
    command: AirlineCommand,
) -> Result<(), CliError> {
    match command {
        AirlineCommand::Create(fields) => print_json(&service.create(fields.into())?),
        AirlineCommand::Get { id } => print_json(&service.find_one(id)?),
        AirlineCommand::List => print_json(&service.find_all()?),
        AirlineCommand::Update { id, fields } => print_json(&service.update(id, fields.into())?),
        AirlineCommand::Delete { id } => {
            service.delete(id)?;
            Ok(())
        }
    }
}

fn run_association(
    service: AssociationService<SqliteAirlineRepository<'_>, SqliteAirportRepository<'_>>,
    command: AssociationCommand,
) -> Result<(), CliError> {
    let operation = match &command {
        AssociationCommand::Add { .. } => Operation::AddAssociation,
        AssociationCommand::Get { .. } => Operation::GetAssociation,
        AssociationCommand::List { .. } => Operation::ListAssociations,
        AssociationCommand::Replace { .. } => Operation::ReplaceAssociations,
        AssociationCommand::Remove { .. } => Operation::RemoveAssociation,
    };

    match command {
        AssociationCommand::Add {
            airline_id,
            airport_id,
        } => print_json(&service.add_airport_to_airline(airline_id, airport_id)?)?,
        AssociationCommand::Get {
            airline_id,
            airport_id,
        } => print_json(&service.find_airport_from_airline(airline_id, airport_id)?)?,
        AssociationCommand::List { airline_id } => {
            print_json(&service.find_airports_from_airline(airline_id)?)?
        }
        AssociationCommand::Replace {
            airline_id,
            airport_ids,
        } => print_json(&service.update_airports_from_airline(airline_id, &airport_ids)?)?,
        AssociationCommand::Remove {
            airline_id,
            airport_id,
        } => service.delete_airport_from_airline(airline_id, airport_id)?,
    }

    info!(
        "event=cli_command module=cli status=ok operation={} status_code={}",
        operation.as_str(),
        operation.success_status()
    );
    Ok(())
}

fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::Setup(format!("cannot render output: {err}")))?;
    println!("{rendered}");
    Ok(())
}
