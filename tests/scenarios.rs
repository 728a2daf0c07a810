//! End-to-end scenarios against a file-backed database

use reservations::{Error, Person, PersonUpdate, Place, PlaceUpdate, SqliteStore, UpdateOutcome};
use tempfile::TempDir;

fn open_temp() -> (TempDir, SqliteStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(&dir.path().join("reservation_system.db")).unwrap();
    (dir, store)
}

/// The two people, two places and two bookings the tool was first demonstrated with
fn demo_fixture(store: &SqliteStore) {
    store.add_person(&Person::new(123456789, "Ali", "Rezaei")).unwrap();
    store.add_place(&Place::new("Park Shahr", "021-12345678", 100000.0)).unwrap();
    store.make_reservation(123456789, "Park Shahr", "2023-04-05").unwrap();

    store.add_person(&Person::new(136782939, "Mohamamad", "Ahmadi")).unwrap();
    store.add_place(&Place::new("char bagh", "021-26724726482", 0.0)).unwrap();
    store.make_reservation(136782939, "char bagh", "2023-04-06").unwrap();
}

#[test]
fn add_person_twice_keeps_one_row() {
    let (_dir, store) = open_temp();
    store.add_person(&Person::new(123456789, "Ali", "Rezaei")).unwrap();

    let err = store.add_person(&Person::new(123456789, "Ali", "Rezaei")).unwrap_err();
    assert!(matches!(err, Error::DuplicatePerson(123456789)));
    assert_eq!(store.count_people().unwrap(), 1);
}

#[test]
fn person_round_trips_names() {
    let (_dir, store) = open_temp();
    store.add_person(&Person::new(555, "Neda", "Hosseini")).unwrap();

    let person = store.get_person(555).unwrap().unwrap();
    assert_eq!((person.first_name.as_str(), person.last_name.as_str()), ("Neda", "Hosseini"));
}

#[test]
fn invalid_date_leaves_reservations_unchanged() {
    let (_dir, store) = open_temp();
    demo_fixture(&store);
    let before = store.count_reservations().unwrap();

    let err = store.make_reservation(123456789, "Park Shahr", "2023-13-40").unwrap_err();
    assert!(matches!(err, Error::InvalidDate(_)));
    assert_eq!(err.kind(), "invalid_date");
    assert_eq!(store.count_reservations().unwrap(), before);
}

#[test]
fn reservation_at_unknown_place_is_an_integrity_error() {
    let (_dir, store) = open_temp();
    demo_fixture(&store);

    let err = store.make_reservation(123456789, "Mellat Park", "2023-05-01").unwrap_err();
    assert!(matches!(err, Error::UnknownReference { .. }));
    assert_eq!(err.kind(), "integrity");
    assert!(err.is_recoverable());
}

#[test]
fn partial_update_touches_only_supplied_fields() {
    let (_dir, store) = open_temp();
    store
        .add_person(&Person::new(123456789, "Ali", "Rezaei").with_picture(vec![1, 2, 3]))
        .unwrap();

    store.update_person(123456789, &PersonUpdate::new().first_name("X")).unwrap();
    let person = store.get_person(123456789).unwrap().unwrap();
    assert_eq!(person.first_name, "X");
    assert_eq!(person.last_name, "Rezaei");
    assert_eq!(person.picture, Some(vec![1, 2, 3]));

    let outcome = store.update_person(123456789, &PersonUpdate::new()).unwrap();
    assert_eq!(outcome, UpdateOutcome::NothingToUpdate);
    assert_eq!(store.get_person(123456789).unwrap().unwrap(), person);
}

#[test]
fn place_fee_report_for_single_reservation() {
    let (_dir, store) = open_temp();
    store.add_person(&Person::new(123456789, "Ali", "Rezaei")).unwrap();
    store.add_place(&Place::new("Park Shahr", "021-12345678", 100000.0)).unwrap();
    store.make_reservation(123456789, "Park Shahr", "2023-04-05").unwrap();

    let rows = store.place_fees("Park Shahr").unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.first_name, "Ali");
    assert_eq!(row.last_name, "Rezaei");
    assert_eq!(row.reservation_count, 1);
    assert_eq!(row.total_fee, 100000.0);
}

#[test]
fn two_dates_at_same_place_count_twice() {
    let (_dir, store) = open_temp();
    demo_fixture(&store);
    store.make_reservation(123456789, "Park Shahr", "2023-04-12").unwrap();

    let report = store.person_reservations(123456789).unwrap();
    assert_eq!(report.count_for("Park Shahr"), 2);
    assert_eq!(report.visits.len(), 1);
}

#[test]
fn range_returns_only_january() {
    let (_dir, store) = open_temp();
    demo_fixture(&store);
    store.make_reservation(123456789, "Park Shahr", "2023-01-10").unwrap();
    store.make_reservation(123456789, "Park Shahr", "2023-02-10").unwrap();

    let (person, visits) = store
        .person_reservations_in_range(123456789, "2023-01-01", "2023-01-31")
        .unwrap();
    assert_eq!(person.national_id, 123456789);
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].place, "Park Shahr");
    assert_eq!(visits[0].date.to_string(), "2023-01-10");
}

#[test]
fn demo_sequence_reports() {
    let (_dir, store) = open_temp();
    demo_fixture(&store);

    let report = store.person_reservations(123456789).unwrap();
    assert_eq!(report.person.full_name(), "Ali Rezaei");
    assert_eq!(report.count_for("Park Shahr"), 1);

    // Zero-fee place still lists the visitor
    let rows = store.place_fees("char bagh").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].first_name, "Mohamamad");
    assert_eq!(rows[0].total_fee, 0.0);

    // The demonstration queried an ID that was never added
    assert!(matches!(
        store.person_reservations_in_range(123, "2023-01-01", "2023-01-31"),
        Err(Error::PersonNotFound(123))
    ));
}

#[test]
fn commented_out_updates_apply() {
    let (_dir, store) = open_temp();
    demo_fixture(&store);

    store
        .update_person(123456789, &PersonUpdate::new().first_name("mohsen").last_name("sadghei"))
        .unwrap();
    store
        .update_place(
            "Park Shahr",
            &PlaceUpdate::new().phone_number("021-98765432").reservation_fee(150000.0),
        )
        .unwrap();
    store
        .update_reservation(136782939, "char bagh", "2023-04-06", "2023-04-10")
        .unwrap();

    let rows = store.place_fees("Park Shahr").unwrap();
    assert_eq!(rows[0].last_name, "sadghei");
    assert_eq!(rows[0].total_fee, 150000.0);

    let (_, visits) = store
        .person_reservations_in_range(136782939, "2023-04-01", "2023-04-30")
        .unwrap();
    assert_eq!(visits[0].date.to_string(), "2023-04-10");
}

#[test]
fn data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reservation_system.db");
    {
        let store = SqliteStore::open(&path).unwrap();
        demo_fixture(&store);
    }

    // Schema init is idempotent and foreign keys are back on
    let store = SqliteStore::open(&path).unwrap();
    let stats = store.stats().unwrap();
    assert_eq!((stats.people, stats.places, stats.reservations), (2, 2, 2));
    assert!(matches!(
        store.make_reservation(999, "Park Shahr", "2023-06-01"),
        Err(Error::UnknownReference { .. })
    ));
}
