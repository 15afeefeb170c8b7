//! Core data model for the digest.
//!
//! Assignments are what the calendar generates on every run.
//! Tasks are assignments plus a completion flag, and are what the store persists.

mod assignment;
mod course;
mod task;

pub use assignment::Assignment;
pub use course::{AssignmentKind, Course, Platform};
pub use task::Task;

/// The civil time zone every due date is expressed in.
pub const CENTRAL: &str = "America/Chicago";

/// Serde helpers for due timestamps.
///
/// Written as ISO-8601 with the Central Time offset (`2025-01-27T23:59:00-06:00`)
/// so the dashboard can hand the string straight to `Date`.
/// Read back from any timestamp that carries an offset.
pub(crate) mod due_at {
    use jiff::{Timestamp, tz::TimeZone};
    use serde::{Deserialize, Deserializer, Serializer, de, ser};

    use super::CENTRAL;

    pub fn serialize<S: Serializer>(ts: &Timestamp, s: S) -> Result<S::Ok, S::Error> {
        let tz = TimeZone::get(CENTRAL).map_err(ser::Error::custom)?;
        let zoned = ts.to_zoned(tz);
        s.collect_str(&zoned.strftime("%Y-%m-%dT%H:%M:%S%:z"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Timestamp, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse::<Timestamp>().map_err(de::Error::custom)
    }
}
