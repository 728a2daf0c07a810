//! SQLite storage implementation

use std::path::Path;
use rusqlite::types::Value;
use rusqlite::{Connection, ErrorCode, OptionalExtension, params, params_from_iter};
use serde::Serialize;
use crate::{Error, NationalId, Result};
use crate::person::{Person, PersonChange, PersonUpdate};
use crate::place::{Place, PlaceChange, PlaceUpdate, validate_fee};
use crate::report::{DatedVisit, DbStats, PersonReport, PlaceFeeRow, PlaceVisits};
use crate::reservation::{Reservation, ReservationDate};
use super::schema;

/// Result of an update request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// The row was found and rewritten
    Updated,
    /// The request carried no fields, nothing was written
    NothingToUpdate,
}

/// SQLite-backed storage for people, places and reservations.
///
/// The store owns the only connection; dropping it closes the database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        tracing::debug!("Opening database {}", path.display());
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Enable foreign keys and create the tables if missing
    fn initialize_schema(&self) -> Result<()> {
        // SQLite ships with foreign keys off; they are per-connection.
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== Person Operations ==========

    /// Insert a person unless the national ID is already taken
    pub fn add_person(&self, person: &Person) -> Result<()> {
        if self.person_exists(person.national_id)? {
            tracing::warn!("Person {} already exists, skipping insert", person.national_id);
            return Err(Error::DuplicatePerson(person.national_id));
        }

        self.conn
            .execute(
                "INSERT INTO person (national_id, first_name, last_name, picture) VALUES (?1, ?2, ?3, ?4)",
                params![
                    person.national_id,
                    person.first_name,
                    person.last_name,
                    person.picture,
                ],
            )
            .map_err(|e| match constraint_kind(&e) {
                Some(Constraint::Key) => Error::DuplicatePerson(person.national_id),
                _ => e.into(),
            })?;

        tracing::info!("Added person {} ({})", person.national_id, person.full_name());
        Ok(())
    }

    /// Get a person by national ID
    pub fn get_person(&self, national_id: NationalId) -> Result<Option<Person>> {
        self.conn
            .query_row(
                "SELECT national_id, first_name, last_name, picture FROM person WHERE national_id = ?1",
                [national_id],
                |row| self.row_to_person(row),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Check whether a national ID is registered
    pub fn person_exists(&self, national_id: NationalId) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM person WHERE national_id = ?1",
            [national_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Apply a partial update to a person
    pub fn update_person(&self, national_id: NationalId, update: &PersonUpdate) -> Result<UpdateOutcome> {
        let assignments: Vec<(&'static str, Value)> = update
            .changes()
            .into_iter()
            .map(|change| {
                let column = change.column();
                let value = match change {
                    PersonChange::FirstName(v) | PersonChange::LastName(v) => Value::Text(v),
                    PersonChange::Picture(bytes) => Value::Blob(bytes),
                };
                (column, value)
            })
            .collect();

        if assignments.is_empty() {
            tracing::info!("Nothing to update for person {}", national_id);
            return Ok(UpdateOutcome::NothingToUpdate);
        }

        let affected = self.apply_update(
            "person",
            &assignments,
            "national_id = ?",
            vec![Value::Integer(national_id)],
        )?;
        if affected == 0 {
            return Err(Error::PersonNotFound(national_id));
        }

        tracing::info!("Person with national ID {} has been updated", national_id);
        Ok(UpdateOutcome::Updated)
    }

    /// Count all people
    pub fn count_people(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM person", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Helper to convert a row to a Person
    fn row_to_person(&self, row: &rusqlite::Row) -> rusqlite::Result<Person> {
        Ok(Person {
            national_id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            picture: row.get(3)?,
        })
    }

    // ========== Place Operations ==========

    /// Insert a place unless the name is already taken
    pub fn add_place(&self, place: &Place) -> Result<()> {
        validate_fee(place.reservation_fee)?;
        if self.place_exists(&place.name)? {
            tracing::warn!("Recreational place {} already exists, skipping insert", place.name);
            return Err(Error::DuplicatePlace(place.name.clone()));
        }

        self.conn
            .execute(
                "INSERT INTO recreational_place (name, phone_number, reservation_fee) VALUES (?1, ?2, ?3)",
                params![place.name, place.phone_number, place.reservation_fee],
            )
            .map_err(|e| match constraint_kind(&e) {
                Some(Constraint::Key) => Error::DuplicatePlace(place.name.clone()),
                _ => e.into(),
            })?;

        tracing::info!("Added recreational place {}", place.name);
        Ok(())
    }

    /// Get a place by name
    pub fn get_place(&self, name: &str) -> Result<Option<Place>> {
        self.conn
            .query_row(
                "SELECT name, phone_number, reservation_fee FROM recreational_place WHERE name = ?1",
                [name],
                |row| {
                    Ok(Place {
                        name: row.get(0)?,
                        phone_number: row.get(1)?,
                        reservation_fee: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Check whether a place name is registered
    pub fn place_exists(&self, name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM recreational_place WHERE name = ?1",
            [name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Apply a partial update to a place
    pub fn update_place(&self, name: &str, update: &PlaceUpdate) -> Result<UpdateOutcome> {
        let mut assignments: Vec<(&'static str, Value)> = Vec::new();
        for change in update.changes() {
            let column = change.column();
            let value = match change {
                PlaceChange::PhoneNumber(v) => Value::Text(v),
                PlaceChange::ReservationFee(fee) => Value::Real(validate_fee(fee)?),
            };
            assignments.push((column, value));
        }

        if assignments.is_empty() {
            tracing::info!("Nothing to update for place {}", name);
            return Ok(UpdateOutcome::NothingToUpdate);
        }

        let affected = self.apply_update(
            "recreational_place",
            &assignments,
            "name = ?",
            vec![Value::Text(name.to_string())],
        )?;
        if affected == 0 {
            return Err(Error::PlaceNotFound(name.to_string()));
        }

        tracing::info!("Recreational place named {} has been updated", name);
        Ok(UpdateOutcome::Updated)
    }

    /// Count all places
    pub fn count_places(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM recreational_place", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Reservation Operations ==========

    /// Book `place_name` for a person on `date` (`YYYY-MM-DD`)
    pub fn make_reservation(&self, national_id: NationalId, place_name: &str, date: &str) -> Result<Reservation> {
        let date = ReservationDate::parse(date)?;
        let reservation = Reservation::new(national_id, place_name, date);

        if self.reservation_exists(national_id, place_name, &date)? {
            tracing::warn!(
                "Reservation for {} at {} on {} already exists",
                national_id, place_name, date
            );
            return Err(duplicate_reservation(&reservation));
        }

        self.conn
            .execute(
                "INSERT INTO reservation (national_id, recreation_place_name, reservation_date) VALUES (?1, ?2, ?3)",
                params![national_id, place_name, date.to_db_string()],
            )
            .map_err(|e| match constraint_kind(&e) {
                Some(Constraint::ForeignKey) => Error::UnknownReference {
                    national_id,
                    place: place_name.to_string(),
                },
                Some(Constraint::Key) => duplicate_reservation(&reservation),
                None => e.into(),
            })?;

        tracing::info!("Reserved {} for {} on {}", place_name, national_id, date);
        Ok(reservation)
    }

    /// Check whether the exact (person, place, date) triple is booked
    pub fn reservation_exists(&self, national_id: NationalId, place_name: &str, date: &ReservationDate) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            r#"
            SELECT COUNT(*) FROM reservation
            WHERE national_id = ?1 AND recreation_place_name = ?2 AND reservation_date = ?3
            "#,
            params![national_id, place_name, date.to_db_string()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Move an existing reservation to another date
    pub fn update_reservation(
        &self,
        national_id: NationalId,
        place_name: &str,
        old_date: &str,
        new_date: &str,
    ) -> Result<UpdateOutcome> {
        let new_date = ReservationDate::parse(new_date)?;
        let old_date = ReservationDate::parse(old_date)?;

        if old_date == new_date {
            if self.reservation_exists(national_id, place_name, &old_date)? {
                return Ok(UpdateOutcome::NothingToUpdate);
            }
            return Err(Error::ReservationNotFound {
                national_id,
                place: place_name.to_string(),
                date: old_date.to_db_string(),
            });
        }

        if !self.reservation_exists(national_id, place_name, &old_date)? {
            return Err(Error::ReservationNotFound {
                national_id,
                place: place_name.to_string(),
                date: old_date.to_db_string(),
            });
        }

        let target = Reservation::new(national_id, place_name, new_date);
        if self.reservation_exists(national_id, place_name, &new_date)? {
            tracing::warn!("Cannot move reservation onto existing booking on {}", new_date);
            return Err(duplicate_reservation(&target));
        }

        let affected = self
            .conn
            .execute(
                r#"
                UPDATE reservation
                SET reservation_date = ?1
                WHERE national_id = ?2 AND recreation_place_name = ?3 AND reservation_date = ?4
                "#,
                params![
                    new_date.to_db_string(),
                    national_id,
                    place_name,
                    old_date.to_db_string(),
                ],
            )
            .map_err(|e| match constraint_kind(&e) {
                Some(Constraint::Key) => duplicate_reservation(&target),
                _ => e.into(),
            })?;

        if affected == 0 {
            return Err(Error::ReservationNotFound {
                national_id,
                place: place_name.to_string(),
                date: old_date.to_db_string(),
            });
        }

        tracing::info!("Reservation updated to new date {}", new_date);
        Ok(UpdateOutcome::Updated)
    }

    /// Count all reservations
    pub fn count_reservations(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM reservation", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Reports ==========

    /// A person and how many times they booked each place
    pub fn person_reservations(&self, national_id: NationalId) -> Result<PersonReport> {
        let person = self
            .get_person(national_id)?
            .ok_or(Error::PersonNotFound(national_id))?;

        let mut stmt = self.conn.prepare(
            r#"
            SELECT recreation_place_name, COUNT(*) AS reservation_count
            FROM reservation
            WHERE national_id = ?1
            GROUP BY recreation_place_name
            ORDER BY recreation_place_name
            "#,
        )?;

        let visits = stmt
            .query_map([national_id], |row| {
                let count: i64 = row.get(1)?;
                Ok(PlaceVisits {
                    place: row.get(0)?,
                    count: count as u32,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(PersonReport { person, visits })
    }

    /// A person's reservations between two dates (inclusive), oldest first
    pub fn person_reservations_in_range(
        &self,
        national_id: NationalId,
        start_date: &str,
        end_date: &str,
    ) -> Result<(Person, Vec<DatedVisit>)> {
        let start = ReservationDate::parse(start_date)?;
        let end = ReservationDate::parse(end_date)?;
        if start > end {
            tracing::warn!("Start date {} is after end date {}, range is empty", start, end);
        }

        let person = self
            .get_person(national_id)?
            .ok_or(Error::PersonNotFound(national_id))?;

        let mut stmt = self.conn.prepare(
            r#"
            SELECT recreation_place_name, reservation_date
            FROM reservation
            WHERE national_id = ?1 AND reservation_date BETWEEN ?2 AND ?3
            ORDER BY reservation_date, recreation_place_name
            "#,
        )?;

        let rows = stmt
            .query_map(
                params![national_id, start.to_db_string(), end.to_db_string()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut visits = Vec::with_capacity(rows.len());
        for (place, date) in rows {
            visits.push(DatedVisit {
                place,
                date: ReservationDate::parse(&date)?,
            });
        }

        Ok((person, visits))
    }

    /// Per-person reservation counts and fee totals at one place
    pub fn place_fees(&self, place_name: &str) -> Result<Vec<PlaceFeeRow>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT p.first_name, p.last_name, COUNT(r.reservation_date) AS reservation_count,
                   COUNT(r.reservation_date) * rp.reservation_fee AS total_fee
            FROM person p
            JOIN reservation r ON p.national_id = r.national_id
            JOIN recreational_place rp ON r.recreation_place_name = rp.name
            WHERE r.recreation_place_name = ?1
            GROUP BY p.national_id
            ORDER BY p.last_name, p.first_name, p.national_id
            "#,
        )?;

        let rows = stmt
            .query_map([place_name], |row| {
                let count: i64 = row.get(2)?;
                Ok(PlaceFeeRow {
                    first_name: row.get(0)?,
                    last_name: row.get(1)?,
                    reservation_count: count as u32,
                    total_fee: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            people: self.count_people()?,
            places: self.count_places()?,
            reservations: self.count_reservations()?,
        })
    }

    // ========== Helpers ==========

    /// Run `UPDATE <table> SET <col> = ?, ... WHERE <key_clause>`.
    ///
    /// Column names only ever come from the fixed change enums; every value
    /// is a bound parameter.
    fn apply_update(
        &self,
        table: &'static str,
        assignments: &[(&'static str, Value)],
        key_clause: &'static str,
        key: Vec<Value>,
    ) -> Result<usize> {
        let set_clause = assignments
            .iter()
            .map(|(column, _)| format!("{} = ?", column))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE {} SET {} WHERE {}", table, set_clause, key_clause);
        tracing::debug!("{}", sql);

        let values = assignments
            .iter()
            .map(|(_, value)| value.clone())
            .chain(key);
        let affected = self.conn.execute(&sql, params_from_iter(values))?;
        Ok(affected)
    }
}

/// Which kind of constraint a failed statement tripped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Constraint {
    /// Primary key or unique
    Key,
    ForeignKey,
}

fn constraint_kind(err: &rusqlite::Error) -> Option<Constraint> {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            match e.extended_code {
                rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(Constraint::ForeignKey),
                rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY | rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE => {
                    Some(Constraint::Key)
                }
                _ => None,
            }
        }
        _ => None,
    }
}

fn duplicate_reservation(reservation: &Reservation) -> Error {
    Error::DuplicateReservation {
        national_id: reservation.national_id,
        place: reservation.place.clone(),
        date: reservation.date.to_db_string(),
    }
}
