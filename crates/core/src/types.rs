/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Character class identifier (1..=8).
pub type ClassId = i32;

/// Best reward score of a character.
pub type Score = i64;
