//! Person records and partial updates

use crate::NationalId;
use serde::{Serialize, Serializer};

/// A natural person identified by a unique national ID.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    pub national_id: NationalId,
    pub first_name: String,
    pub last_name: String,
    /// Encoded image payload (PNG, JPEG, ...), if any
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "picture_len")]
    pub picture: Option<Vec<u8>>,
}

impl Person {
    pub fn new(national_id: NationalId, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            national_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            picture: None,
        }
    }

    pub fn with_picture(mut self, picture: Vec<u8>) -> Self {
        self.picture = Some(picture);
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A single column assignment on the `person` relation.
#[derive(Debug, Clone, PartialEq)]
pub enum PersonChange {
    FirstName(String),
    LastName(String),
    Picture(Vec<u8>),
}

impl PersonChange {
    /// Column this change writes to
    pub fn column(&self) -> &'static str {
        match self {
            PersonChange::FirstName(_) => "first_name",
            PersonChange::LastName(_) => "last_name",
            PersonChange::Picture(_) => "picture",
        }
    }
}

/// Partial update of a person. Only the supplied fields are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub picture: Option<Vec<u8>>,
}

impl PersonUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn picture(mut self, value: Vec<u8>) -> Self {
        self.picture = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.picture.is_none()
    }

    /// Column assignments in a fixed order
    pub fn changes(&self) -> Vec<PersonChange> {
        let mut changes = Vec::new();
        if let Some(first_name) = &self.first_name {
            changes.push(PersonChange::FirstName(first_name.clone()));
        }
        if let Some(last_name) = &self.last_name {
            changes.push(PersonChange::LastName(last_name.clone()));
        }
        if let Some(picture) = &self.picture {
            changes.push(PersonChange::Picture(picture.clone()));
        }
        changes
    }
}

/// JSON carries the picture size only, never the raw bytes.
fn picture_len<S: Serializer>(picture: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
    match picture {
        Some(bytes) => s.serialize_str(&format!("{} bytes", bytes.len())),
        None => s.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update_has_no_changes() {
        let update = PersonUpdate::new();
        assert!(update.is_empty());
        assert!(update.changes().is_empty());
    }

    #[test]
    fn test_changes_only_cover_supplied_fields() {
        let update = PersonUpdate::new().last_name("Sadeghi");
        let changes = update.changes();
        assert_eq!(changes, vec![PersonChange::LastName("Sadeghi".to_string())]);
        assert_eq!(changes[0].column(), "last_name");
    }

    #[test]
    fn test_json_hides_picture_bytes() {
        let person = Person::new(1, "Ali", "Rezaei").with_picture(vec![1, 2, 3]);
        let json = serde_json::to_value(&person).unwrap();
        assert_eq!(json["picture"], "3 bytes");
        assert_eq!(json["first_name"], "Ali");
    }
}
