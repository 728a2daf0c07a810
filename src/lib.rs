//! # Reservations - people, recreational places and bookings
//!
//! A small administrative tool backed by a single SQLite file.
//!
//! Reservations provides:
//! - Person and Place registries keyed by national ID and place name
//! - Date-based reservations, unique per (person, place, date)
//! - Partial updates through structured update requests
//! - Reports: per-person history, date ranges and per-place fee totals

pub mod person;
pub mod place;
pub mod reservation;
pub mod report;
pub mod storage;
pub mod picture;
pub mod output;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use person::{Person, PersonUpdate};
pub use place::{Place, PlaceUpdate};
pub use reservation::{Reservation, ReservationDate};
pub use report::{DatedVisit, DbStats, PersonReport, PlaceFeeRow, PlaceVisits};
pub use storage::{SqliteStore, UpdateOutcome};
pub use output::{OutputMode, emit_error, emit_success};

/// National identifier of a person
pub type NationalId = i64;

/// Result type alias for reservation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for reservation operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Person with national ID {0} already exists")]
    DuplicatePerson(NationalId),

    #[error("Recreational place {0} already exists")]
    DuplicatePlace(String),

    #[error("Reservation for national ID {national_id} at place {place} on date {date} already exists")]
    DuplicateReservation {
        national_id: NationalId,
        place: String,
        date: String,
    },

    #[error("Invalid date format '{0}'. Please use YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid reservation fee {0}: must be a non-negative number")]
    InvalidFee(f64),

    #[error("Reservation references an unknown person ({national_id}) or place ({place})")]
    UnknownReference { national_id: NationalId, place: String },

    #[error("No person found with national ID {0}")]
    PersonNotFound(NationalId),

    #[error("No recreational place named {0}")]
    PlaceNotFound(String),

    #[error("No reservation for national ID {national_id} at place {place} on date {date}")]
    ReservationNotFound {
        national_id: NationalId,
        place: String,
        date: String,
    },

    #[error("Picture error: {0}")]
    Picture(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the run can carry on after reporting this error.
    ///
    /// Everything except a failing storage layer or IO is a domain
    /// condition that is reported and skipped.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Storage(_) | Error::Io(_))
    }

    /// Short machine-readable name, used in JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Storage(_) => "storage",
            Error::DuplicatePerson(_) | Error::DuplicatePlace(_) | Error::DuplicateReservation { .. } => {
                "duplicate"
            }
            Error::InvalidDate(_) => "invalid_date",
            Error::InvalidFee(_) => "invalid_fee",
            Error::UnknownReference { .. } => "integrity",
            Error::PersonNotFound(_) | Error::PlaceNotFound(_) | Error::ReservationNotFound { .. } => {
                "not_found"
            }
            Error::Picture(_) => "picture",
            Error::Io(_) => "io",
        }
    }
}
