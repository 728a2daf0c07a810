//! Database schema definitions

/// SQL to create the person table
pub const CREATE_PERSON_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS person (
    national_id INTEGER PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    picture BLOB
)
"#;

/// SQL to create the recreational_place table
pub const CREATE_PLACE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS recreational_place (
    name TEXT PRIMARY KEY,
    phone_number TEXT NOT NULL,
    reservation_fee REAL NOT NULL
)
"#;

/// SQL to create the reservation table.
/// One row per (person, place, date); both sides must exist.
pub const CREATE_RESERVATION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS reservation (
    national_id INTEGER NOT NULL,
    recreation_place_name TEXT NOT NULL,
    reservation_date TEXT NOT NULL,
    PRIMARY KEY (national_id, recreation_place_name, reservation_date),
    FOREIGN KEY (national_id) REFERENCES person (national_id),
    FOREIGN KEY (recreation_place_name) REFERENCES recreational_place (name)
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_reservation_place ON reservation(recreation_place_name)",
    "CREATE INDEX IF NOT EXISTS idx_reservation_date ON reservation(national_id, reservation_date)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_PERSON_TABLE,
        CREATE_PLACE_TABLE,
        CREATE_RESERVATION_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
