//! Reservation dates and the (person, place, date) triple

use crate::{Error, NationalId, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::str::FromStr;

/// Storage and input format of every reservation date
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A calendar date written exactly as `YYYY-MM-DD`.
///
/// Dates are stored as text, so the canonical form keeps string ordering
/// identical to calendar ordering (range queries rely on it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReservationDate(NaiveDate);

impl ReservationDate {
    /// Parse a date, rejecting anything but a real, zero-padded `YYYY-MM-DD`.
    pub fn parse(s: &str) -> Result<Self> {
        if !has_date_shape(s) {
            return Err(Error::InvalidDate(s.to_string()));
        }
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Self)
            .map_err(|_| Error::InvalidDate(s.to_string()))
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// Canonical text form, as persisted
    pub fn to_db_string(&self) -> String {
        self.0.format(DATE_FORMAT).to_string()
    }
}

/// `DDDD-DD-DD` with ASCII digits; chrono's `%Y` alone takes signs and any width.
fn has_date_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

impl FromStr for ReservationDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for ReservationDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

impl Serialize for ReservationDate {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_db_string())
    }
}

/// A booking of a place by a person on a given date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reservation {
    pub national_id: NationalId,
    pub place: String,
    pub date: ReservationDate,
}

impl Reservation {
    pub fn new(national_id: NationalId, place: impl Into<String>, date: ReservationDate) -> Self {
        Self {
            national_id,
            place: place.into(),
            date,
        }
    }
}
