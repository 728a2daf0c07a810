//! Recreational places and partial updates

use crate::{Error, Result};
use serde::Serialize;

/// A recreational venue identified by its unique name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub name: String,
    pub phone_number: String,
    /// Fee charged per reservation
    pub reservation_fee: f64,
}

impl Place {
    pub fn new(name: impl Into<String>, phone_number: impl Into<String>, reservation_fee: f64) -> Self {
        Self {
            name: name.into(),
            phone_number: phone_number.into(),
            reservation_fee,
        }
    }
}

/// Reject negative, NaN and infinite fees before they reach the store.
pub fn validate_fee(fee: f64) -> Result<f64> {
    if fee.is_finite() && fee >= 0.0 {
        Ok(fee)
    } else {
        Err(Error::InvalidFee(fee))
    }
}

/// A single column assignment on the `recreational_place` relation.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceChange {
    PhoneNumber(String),
    ReservationFee(f64),
}

impl PlaceChange {
    pub fn column(&self) -> &'static str {
        match self {
            PlaceChange::PhoneNumber(_) => "phone_number",
            PlaceChange::ReservationFee(_) => "reservation_fee",
        }
    }
}

/// Partial update of a place. Only the supplied fields are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceUpdate {
    pub phone_number: Option<String>,
    pub reservation_fee: Option<f64>,
}

impl PlaceUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phone_number(mut self, value: impl Into<String>) -> Self {
        self.phone_number = Some(value.into());
        self
    }

    pub fn reservation_fee(mut self, value: f64) -> Self {
        self.reservation_fee = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.phone_number.is_none() && self.reservation_fee.is_none()
    }

    pub fn changes(&self) -> Vec<PlaceChange> {
        let mut changes = Vec::new();
        if let Some(phone) = &self.phone_number {
            changes.push(PlaceChange::PhoneNumber(phone.clone()));
        }
        if let Some(fee) = self.reservation_fee {
            changes.push(PlaceChange::ReservationFee(fee));
        }
        changes
    }
}
