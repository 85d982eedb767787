use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alarm::{Alarm, AlarmId};

/// On-disk shape of the scheduled slot.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoredAlarm {
    pub date: DateTime<Utc>,
    pub id: String,
}

impl From<&Alarm> for StoredAlarm {
    fn from(alarm: &Alarm) -> Self {
        Self {
            date: alarm.date,
            id: alarm.id.as_str().to_owned(),
        }
    }
}

impl From<StoredAlarm> for Alarm {
    fn from(stored: StoredAlarm) -> Self {
        Alarm::with_id(stored.date, AlarmId::from(stored.id))
    }
}

pub fn encode(alarm: &Alarm) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&StoredAlarm::from(alarm))
}

pub fn decode(bytes: &[u8]) -> Result<Alarm, serde_json::Error> {
    serde_json::from_slice::<StoredAlarm>(bytes).map(Into::into)
}
