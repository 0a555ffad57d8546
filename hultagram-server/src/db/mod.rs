pub mod schema;
pub mod connection;
pub mod repositories;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;

pub use connection::{Database, DbConnection, DbPool};

/// Fixed-width RFC 3339 so that lexical order in SQLite is chronological order
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp column, reporting bad data as a conversion error
pub fn parse_timestamp(column: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// True when `err` was raised by a UNIQUE / CHECK / FOREIGN KEY constraint
pub fn is_constraint_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(e, _)) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamps_sort_lexically() {
        let whole = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let later = whole + chrono::Duration::microseconds(1);

        let a = format_timestamp(&whole);
        let b = format_timestamp(&later);
        assert_eq!(a.len(), b.len());
        assert!(a < b);
        assert_eq!(parse_timestamp(0, &b).unwrap(), later);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp(3, "yesterday").is_err());
    }
}
