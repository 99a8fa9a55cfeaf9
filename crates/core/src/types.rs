/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Agency user id issued by the hosted auth provider (JWT `sub`).
pub type OwnerId = uuid::Uuid;

/// Calendar day. Dates are always interpreted as UTC days.
pub type Day = chrono::NaiveDate;

/// Today's date in UTC.
pub fn today_utc() -> Day {
    chrono::Utc::now().date_naive()
}
