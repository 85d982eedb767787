use std::fmt;

use chrono::{DateTime, Duration, Local, Utc};
use uuid::Uuid;

pub const ALARM_CATEGORY_ID: &str = "AlarmNotification";
pub const SNOOZE_ACTION_ID: &str = "snooze";
pub const SNOOZE_ACTION_TITLE: &str = "Snooze";

pub const ALARM_TITLE: &str = "Alarm";
pub const ALARM_BODY: &str = "Beep Beep";

pub const SNOOZE_INTERVAL: Duration = Duration::minutes(9);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlarmId(String);

impl AlarmId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AlarmId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for AlarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single pending wake-up: a point in time plus the identifier used to
/// correlate it with the notification request submitted for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alarm {
    pub date: DateTime<Utc>,
    pub id: AlarmId,
}

impl Alarm {
    pub fn new(date: DateTime<Utc>) -> Self {
        Self {
            date,
            id: AlarmId::generate(),
        }
    }

    /// Rebuilds an alarm that was already submitted under `id`.
    pub fn with_id(date: DateTime<Utc>, id: AlarmId) -> Self {
        Self { date, id }
    }

    pub fn snoozed_from(now: DateTime<Utc>) -> Self {
        Self::new(now + SNOOZE_INTERVAL)
    }

    pub fn local_date(&self) -> DateTime<Local> {
        self.date.with_timezone(&Local)
    }
}
