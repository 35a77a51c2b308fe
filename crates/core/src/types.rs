/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Render a timestamp in the sortable wire format used by [`Laboratory`]
/// records: RFC 3339 with millisecond precision and a `Z` suffix.
///
/// [`Laboratory`]: crate::laboratory::Laboratory
pub fn to_wire_timestamp(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
