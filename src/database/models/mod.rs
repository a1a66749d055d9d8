pub mod goal;
pub mod task;

pub use goal::{Goal, GoalCategory, GoalPatch, NewGoal, ProgressUpdate};
pub use task::{NewTask, Task, TaskCategory, TaskPatch, TaskPriority};

/// Date fields on the wire accept either RFC 3339 timestamps or plain
/// `YYYY-MM-DD` calendar dates (what the SPA forms submit). Plain dates
/// resolve to midnight UTC.
pub(crate) mod flexible_date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn parse(value: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(ndt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(Utc.from_utc_datetime(&ndt));
        }
        if let Ok(nd) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            return Some(Utc.from_utc_datetime(&nd.and_hms_opt(0, 0, 0)?));
        }
        None
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        parse(&value).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", value)))
    }

    pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(value) => parse(&value)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", value))),
        }
    }

}
