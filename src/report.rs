//! Read models returned by the reporting queries

use crate::person::Person;
use crate::reservation::ReservationDate;
use serde::Serialize;

/// Number of reservations a person holds at one place
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceVisits {
    pub place: String,
    pub count: u32,
}

/// A person together with their reservation counts per place.
///
/// An empty `visits` list means the person exists but has never reserved.
#[derive(Debug, Clone, Serialize)]
pub struct PersonReport {
    pub person: Person,
    pub visits: Vec<PlaceVisits>,
}

impl PersonReport {
    /// Reservation count at `place`, zero if never visited
    pub fn count_for(&self, place: &str) -> u32 {
        self.visits
            .iter()
            .find(|v| v.place == place)
            .map(|v| v.count)
            .unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.visits.iter().map(|v| v.count).sum()
    }
}

/// One reservation inside a date range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatedVisit {
    pub place: String,
    pub date: ReservationDate,
}

/// Per-person totals at a single place
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceFeeRow {
    pub first_name: String,
    pub last_name: String,
    pub reservation_count: u32,
    pub total_fee: f64,
}

/// Database statistics
#[derive(Debug, Clone, Serialize)]
pub struct DbStats {
    pub people: usize,
    pub places: usize,
    pub reservations: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  People: {}", self.people)?;
        writeln!(f, "  Places: {}", self.places)?;
        writeln!(f, "  Reservations: {}", self.reservations)
    }
}
