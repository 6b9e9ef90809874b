use rusqlite::Connection;
use skylink_core::db::open_db_in_memory;
use skylink_core::{
    Airline, AirlineService, Airport, AirportId, AirportService, AssociationService, EntityKind,
    ErrorKind, NewAirline, NewAirport, Operation, ServiceError, SqliteAirlineRepository,
    SqliteAirportRepository,
};
use std::collections::HashSet;
use uuid::Uuid;

// 1990-01-01T00:00:00Z
const FOUNDED_1990: i64 = 631_152_000_000;

type Links<'conn> =
    AssociationService<SqliteAirlineRepository<'conn>, SqliteAirportRepository<'conn>>;

fn links(conn: &Connection) -> Links<'_> {
    AssociationService::new(
        SqliteAirlineRepository::try_new(conn).unwrap(),
        SqliteAirportRepository::try_new(conn).unwrap(),
    )
}

fn create_airline(conn: &Connection, name: &str) -> Airline {
    AirlineService::new(SqliteAirlineRepository::try_new(conn).unwrap())
        .create(NewAirline {
            name: name.to_string(),
            description: format!("{name} operates scheduled flights"),
            founded_at: FOUNDED_1990,
            website: format!("https://www.{}.com", name.to_lowercase()),
        })
        .unwrap()
}

fn create_airport(conn: &Connection, code: &str) -> Airport {
    AirportService::new(SqliteAirportRepository::try_new(conn).unwrap())
        .create(NewAirport {
            name: format!("{code} International"),
            code: code.to_string(),
            country: "USA".to_string(),
            city: format!("{code} city"),
        })
        .unwrap()
}

fn ids(airports: &[Airport]) -> HashSet<AirportId> {
    airports.iter().map(|airport| airport.id).collect()
}

fn assert_not_found(err: ServiceError, expected: EntityKind) {
    match err {
        ServiceError::NotFound { entity, .. } => assert_eq!(entity, expected),
        other => panic!("expected not found {expected}, got: {other:?}"),
    }
}

#[test]
fn add_then_get_returns_the_same_airport() {
    let conn = open_db_in_memory().unwrap();
    let airline = create_airline(&conn, "Delta");
    let airport = create_airport(&conn, "ATL");
    let service = links(&conn);

    let updated = service.add_airport_to_airline(airline.id, airport.id).unwrap();
    assert_eq!(updated.id, airline.id);
    assert_eq!(updated.airports, vec![airport.clone()]);

    let found = service
        .find_airport_from_airline(airline.id, airport.id)
        .unwrap();
    assert_eq!(found, airport);
}

#[test]
fn add_with_missing_airport_is_not_found_airport() {
    let conn = open_db_in_memory().unwrap();
    let airline = create_airline(&conn, "Delta");
    let service = links(&conn);

    let err = service
        .add_airport_to_airline(airline.id, Uuid::new_v4())
        .unwrap_err();
    assert_not_found(err, EntityKind::Airport);
}

#[test]
fn add_with_missing_airline_is_not_found_airline() {
    let conn = open_db_in_memory().unwrap();
    let airport = create_airport(&conn, "ATL");
    let service = links(&conn);

    let err = service
        .add_airport_to_airline(Uuid::new_v4(), airport.id)
        .unwrap_err();
    assert_eq!(err.message(), "The airline with the given id was not found");
    assert_not_found(err, EntityKind::Airline);
}

#[test]
fn airline_is_checked_before_airport_when_both_are_missing() {
    let conn = open_db_in_memory().unwrap();
    let service = links(&conn);
    let (airline_id, airport_id) = (Uuid::new_v4(), Uuid::new_v4());

    assert_not_found(
        service
            .add_airport_to_airline(airline_id, airport_id)
            .unwrap_err(),
        EntityKind::Airline,
    );
    assert_not_found(
        service
            .find_airport_from_airline(airline_id, airport_id)
            .unwrap_err(),
        EntityKind::Airline,
    );
    assert_not_found(
        service
            .delete_airport_from_airline(airline_id, airport_id)
            .unwrap_err(),
        EntityKind::Airline,
    );
    assert_not_found(
        service
            .update_airports_from_airline(airline_id, &[airport_id])
            .unwrap_err(),
        EntityKind::Airline,
    );
    assert_not_found(
        service.find_airports_from_airline(airline_id).unwrap_err(),
        EntityKind::Airline,
    );
}

#[test]
fn unlinked_existing_pair_is_not_associated() {
    let conn = open_db_in_memory().unwrap();
    let airline = create_airline(&conn, "Delta");
    let airport = create_airport(&conn, "ATL");
    let service = links(&conn);

    let get_err = service
        .find_airport_from_airline(airline.id, airport.id)
        .unwrap_err();
    assert_eq!(get_err.kind(), ErrorKind::NotAssociated);
    assert_eq!(
        get_err.message(),
        "The airport with the given id is not associated to the airline"
    );

    let remove_err = service
        .delete_airport_from_airline(airline.id, airport.id)
        .unwrap_err();
    assert!(matches!(
        remove_err,
        ServiceError::NotAssociated { airline_id, airport_id }
            if airline_id == airline.id && airport_id == airport.id
    ));
}

#[test]
fn get_with_missing_airport_is_not_found_not_not_associated() {
    let conn = open_db_in_memory().unwrap();
    let airline = create_airline(&conn, "Delta");
    let service = links(&conn);

    let err = service
        .find_airport_from_airline(airline.id, Uuid::new_v4())
        .unwrap_err();
    assert_not_found(err, EntityKind::Airport);
}

#[test]
fn list_returns_exactly_the_added_airports() {
    let conn = open_db_in_memory().unwrap();
    let airline = create_airline(&conn, "Delta");
    let airports: Vec<Airport> = ["ATL", "JFK", "LAX"]
        .into_iter()
        .map(|code| create_airport(&conn, code))
        .collect();
    let service = links(&conn);

    for airport in &airports {
        service.add_airport_to_airline(airline.id, airport.id).unwrap();
    }

    let listed = service.find_airports_from_airline(airline.id).unwrap();
    assert_eq!(listed.len(), airports.len());
    assert_eq!(ids(&listed), ids(&airports));
}

#[test]
fn list_on_airline_without_links_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let airline = create_airline(&conn, "Delta");

    let listed = links(&conn).find_airports_from_airline(airline.id).unwrap();
    assert!(listed.is_empty());
}

#[test]
fn adding_the_same_airport_twice_keeps_one_link() {
    let conn = open_db_in_memory().unwrap();
    let airline = create_airline(&conn, "Delta");
    let airport = create_airport(&conn, "ATL");
    let service = links(&conn);

    service.add_airport_to_airline(airline.id, airport.id).unwrap();
    let again = service.add_airport_to_airline(airline.id, airport.id).unwrap();

    assert_eq!(again.airports.len(), 1);
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM airline_airports;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn replace_is_a_full_substitution() {
    let conn = open_db_in_memory().unwrap();
    let airline = create_airline(&conn, "Delta");
    let p1 = create_airport(&conn, "ATL");
    let p2 = create_airport(&conn, "JFK");
    let p3 = create_airport(&conn, "LAX");
    let service = links(&conn);
    service.add_airport_to_airline(airline.id, p1.id).unwrap();
    service.add_airport_to_airline(airline.id, p2.id).unwrap();

    let replaced = service
        .update_airports_from_airline(airline.id, &[p3.id])
        .unwrap();

    assert_eq!(replaced.airports, vec![p3.clone()]);
    let listed = service.find_airports_from_airline(airline.id).unwrap();
    assert_eq!(listed, vec![p3]);
    assert_eq!(
        service
            .find_airport_from_airline(airline.id, p1.id)
            .unwrap_err()
            .kind(),
        ErrorKind::NotAssociated
    );
}

#[test]
fn replace_with_invalid_airport_leaves_existing_set_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let airline = create_airline(&conn, "Delta");
    let p1 = create_airport(&conn, "ATL");
    let p2 = create_airport(&conn, "JFK");
    let p3 = create_airport(&conn, "LAX");
    let service = links(&conn);
    service.add_airport_to_airline(airline.id, p1.id).unwrap();
    service.add_airport_to_airline(airline.id, p2.id).unwrap();

    let err = service
        .update_airports_from_airline(airline.id, &[p3.id, Uuid::new_v4()])
        .unwrap_err();

    assert_eq!(err.message(), "The airport with the given id was not found");
    assert_not_found(err, EntityKind::Airport);
    let listed = service.find_airports_from_airline(airline.id).unwrap();
    assert_eq!(listed, vec![p1, p2]);
}

#[test]
fn replace_collapses_repeated_ids_and_keeps_first_position() {
    let conn = open_db_in_memory().unwrap();
    let airline = create_airline(&conn, "Delta");
    let p1 = create_airport(&conn, "ATL");
    let p2 = create_airport(&conn, "JFK");
    let service = links(&conn);

    let replaced = service
        .update_airports_from_airline(airline.id, &[p2.id, p1.id, p2.id])
        .unwrap();

    assert_eq!(replaced.airports, vec![p2, p1]);
}

#[test]
fn replace_with_empty_payload_clears_all_links() {
    let conn = open_db_in_memory().unwrap();
    let airline = create_airline(&conn, "Delta");
    let p1 = create_airport(&conn, "ATL");
    let service = links(&conn);
    service.add_airport_to_airline(airline.id, p1.id).unwrap();

    let replaced = service.update_airports_from_airline(airline.id, &[]).unwrap();

    assert!(replaced.airports.is_empty());
    assert!(service
        .find_airports_from_airline(airline.id)
        .unwrap()
        .is_empty());
}

#[test]
fn removing_the_same_pair_twice_is_detectable() {
    let conn = open_db_in_memory().unwrap();
    let airline = create_airline(&conn, "Delta");
    let airport = create_airport(&conn, "ATL");
    let service = links(&conn);
    service.add_airport_to_airline(airline.id, airport.id).unwrap();

    service
        .delete_airport_from_airline(airline.id, airport.id)
        .unwrap();
    let err = service
        .delete_airport_from_airline(airline.id, airport.id)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotAssociated);
}

#[test]
fn remove_with_missing_airport_is_not_found_airport() {
    let conn = open_db_in_memory().unwrap();
    let airline = create_airline(&conn, "Delta");
    let airport = create_airport(&conn, "ATL");
    let service = links(&conn);
    service.add_airport_to_airline(airline.id, airport.id).unwrap();

    let err = service
        .delete_airport_from_airline(airline.id, Uuid::new_v4())
        .unwrap_err();

    assert_eq!(err.message(), "The airport with the given id was not found");
    assert_not_found(err, EntityKind::Airport);
    assert_eq!(
        service.find_airports_from_airline(airline.id).unwrap(),
        vec![airport]
    );
}

#[test]
fn remove_keeps_both_entity_records() {
    let conn = open_db_in_memory().unwrap();
    let airline = create_airline(&conn, "Delta");
    let airport = create_airport(&conn, "ATL");
    let service = links(&conn);
    service.add_airport_to_airline(airline.id, airport.id).unwrap();

    service
        .delete_airport_from_airline(airline.id, airport.id)
        .unwrap();

    let airports = AirportService::new(SqliteAirportRepository::try_new(&conn).unwrap());
    let airlines = AirlineService::new(SqliteAirlineRepository::try_new(&conn).unwrap());
    assert_eq!(airports.find_one(airport.id).unwrap(), airport);
    assert!(airlines.find_one(airline.id).unwrap().airports.is_empty());
}

#[test]
fn airport_side_reflects_airline_side_mutations() {
    let conn = open_db_in_memory().unwrap();
    let delta = create_airline(&conn, "Delta");
    let united = create_airline(&conn, "United");
    let atl = create_airport(&conn, "ATL");
    let service = links(&conn);
    let airports = AirportService::new(SqliteAirportRepository::try_new(&conn).unwrap());

    service.add_airport_to_airline(delta.id, atl.id).unwrap();
    service.add_airport_to_airline(united.id, atl.id).unwrap();
    let serving: HashSet<_> = airports
        .find_airlines_of_airport(atl.id)
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(serving, HashSet::from([delta.id, united.id]));

    service.delete_airport_from_airline(delta.id, atl.id).unwrap();
    assert_eq!(airports.find_airlines_of_airport(atl.id).unwrap(), vec![united.id]);
}

#[test]
fn airport_view_carries_the_airlines_serving_it() {
    let conn = open_db_in_memory().unwrap();
    let delta = create_airline(&conn, "Delta");
    let atl = create_airport(&conn, "ATL");
    let jfk = create_airport(&conn, "JFK");
    let service = links(&conn);
    service.add_airport_to_airline(delta.id, atl.id).unwrap();

    let view = service.find_airport_with_airlines(atl.id).unwrap();
    assert_eq!(view.airport, atl);
    assert_eq!(view.airlines, vec![delta.clone()]);

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["code"], "ATL");
    assert_eq!(json["airlines"][0]["id"], delta.id.to_string());

    let all = service.find_airports_with_airlines().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].airport.id, atl.id);
    assert_eq!(all[1].airport.id, jfk.id);
    assert!(all[1].airlines.is_empty());

    assert_not_found(
        service.find_airport_with_airlines(Uuid::new_v4()).unwrap_err(),
        EntityKind::Airport,
    );
}

#[test]
fn deleting_an_airport_cascades_to_its_links() {
    let conn = open_db_in_memory().unwrap();
    let airline = create_airline(&conn, "Delta");
    let atl = create_airport(&conn, "ATL");
    let jfk = create_airport(&conn, "JFK");
    let service = links(&conn);
    service
        .update_airports_from_airline(airline.id, &[atl.id, jfk.id])
        .unwrap();

    AirportService::new(SqliteAirportRepository::try_new(&conn).unwrap())
        .delete(atl.id)
        .unwrap();

    let listed = service.find_airports_from_airline(airline.id).unwrap();
    assert_eq!(listed, vec![jfk]);
}

#[test]
fn deleting_an_airline_cascades_to_its_links() {
    let conn = open_db_in_memory().unwrap();
    let airline = create_airline(&conn, "Delta");
    let atl = create_airport(&conn, "ATL");
    links(&conn)
        .add_airport_to_airline(airline.id, atl.id)
        .unwrap();

    AirlineService::new(SqliteAirlineRepository::try_new(&conn).unwrap())
        .delete(airline.id)
        .unwrap();

    let airports = AirportService::new(SqliteAirportRepository::try_new(&conn).unwrap());
    assert!(airports.find_airlines_of_airport(atl.id).unwrap().is_empty());
}

#[test]
fn airline_field_update_keeps_airport_set() {
    let conn = open_db_in_memory().unwrap();
    let airline = create_airline(&conn, "Delta");
    let atl = create_airport(&conn, "ATL");
    links(&conn)
        .add_airport_to_airline(airline.id, atl.id)
        .unwrap();

    let updated = AirlineService::new(SqliteAirlineRepository::try_new(&conn).unwrap())
        .update(
            airline.id,
            NewAirline {
                name: "Delta Air Lines".to_string(),
                description: airline.description.clone(),
                founded_at: airline.founded_at,
                website: airline.website.clone(),
            },
        )
        .unwrap();

    assert_eq!(updated.airports, vec![atl]);
}

#[test]
fn error_kinds_map_to_transport_statuses() {
    let conn = open_db_in_memory().unwrap();
    let airline = create_airline(&conn, "Delta");
    let airport = create_airport(&conn, "ATL");
    let service = links(&conn);

    let not_found = service
        .add_airport_to_airline(Uuid::new_v4(), airport.id)
        .unwrap_err();
    let not_associated = service
        .find_airport_from_airline(airline.id, airport.id)
        .unwrap_err();

    assert_eq!(not_found.kind().status_code(), 404);
    assert_eq!(not_associated.kind().status_code(), 404);
    assert_eq!(Operation::AddAssociation.success_status(), 201);
    assert_eq!(Operation::RemoveAssociation.success_status(), 204);
}

#[test]
fn delta_end_to_end_scenario() {
    let conn = open_db_in_memory().unwrap();
    let delta = create_airline(&conn, "Delta");
    let airports: Vec<Airport> = ["ATL", "JFK", "LAX", "SEA", "MSP"]
        .into_iter()
        .map(|code| create_airport(&conn, code))
        .collect();
    let service = links(&conn);

    for airport in &airports {
        service.add_airport_to_airline(delta.id, airport.id).unwrap();
    }
    let listed = service.find_airports_from_airline(delta.id).unwrap();
    assert_eq!(listed.len(), 5);
    assert_eq!(listed, airports);

    service
        .delete_airport_from_airline(delta.id, airports[0].id)
        .unwrap();

    let remaining = service.find_airports_from_airline(delta.id).unwrap();
    assert_eq!(remaining.len(), 4);
    assert!(remaining.iter().all(|airport| airport.id != airports[0].id));
    assert_eq!(ids(&remaining), ids(&airports[1..]));
}
