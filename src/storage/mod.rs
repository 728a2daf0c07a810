//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - person(national_id, first_name, last_name, picture)
//! - recreational_place(name, phone_number, reservation_fee)
//! - reservation(national_id, recreation_place_name, reservation_date)

pub mod schema;
pub mod sqlite;

pub use sqlite::{SqliteStore, UpdateOutcome};
