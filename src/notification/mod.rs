mod center;
mod local_center;

pub use center::{AuthorizationOptions, AuthorizationStatus, NotificationCenter};
pub use local_center::{LocalNotificationCenter, NotificationEvent};

use chrono::{DateTime, Datelike, Local, LocalResult, NaiveDate, TimeZone, Timelike};

use crate::alarm::{
    ALARM_BODY, ALARM_CATEGORY_ID, ALARM_TITLE, Alarm, AlarmId, SNOOZE_ACTION_ID,
    SNOOZE_ACTION_TITLE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationSound {
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    pub sound: Option<NotificationSound>,
    pub category_id: String,
}

impl NotificationContent {
    pub fn alarm() -> Self {
        Self {
            title: ALARM_TITLE.to_owned(),
            body: ALARM_BODY.to_owned(),
            sound: Some(NotificationSound::Default),
            category_id: ALARM_CATEGORY_ID.to_owned(),
        }
    }
}

/// Calendar fields a trigger matches on. Seconds are not part of the match,
/// so a trigger fires at the start of its minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerDateComponents {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl TriggerDateComponents {
    pub fn from_local(date: &DateTime<Local>) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            hour: date.hour(),
            minute: date.minute(),
        }
    }

    pub fn to_local(&self) -> Option<DateTime<Local>> {
        self.in_zone(&Local)
    }

    /// First instant in `zone` matching these components. `None` when the
    /// date is not on the calendar or the wall-clock time is skipped.
    pub fn in_zone<Tz: TimeZone>(&self, zone: &Tz) -> Option<DateTime<Tz>> {
        let naive = NaiveDate::from_ymd_opt(self.year, self.month, self.day)?
            .and_hms_opt(self.hour, self.minute, 0)?;

        match zone.from_local_datetime(&naive) {
            LocalResult::Single(date) => Some(date),
            LocalResult::Ambiguous(earliest, _) => Some(earliest),
            LocalResult::None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarTrigger {
    pub components: TriggerDateComponents,
    pub repeats: bool,
}

impl CalendarTrigger {
    pub fn once_at(date: &DateTime<Local>) -> Self {
        Self {
            components: TriggerDateComponents::from_local(date),
            repeats: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub identifier: AlarmId,
    pub content: NotificationContent,
    pub trigger: CalendarTrigger,
}

impl NotificationRequest {
    pub fn for_alarm(alarm: &Alarm) -> Self {
        Self {
            identifier: alarm.id.clone(),
            content: NotificationContent::alarm(),
            trigger: CalendarTrigger::once_at(&alarm.local_date()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAction {
    pub identifier: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationCategory {
    pub identifier: String,
    pub actions: Vec<NotificationAction>,
}

/// The category every alarm notification carries: a single snooze action.
pub fn alarm_categories() -> Vec<NotificationCategory> {
    vec![NotificationCategory {
        identifier: ALARM_CATEGORY_ID.to_owned(),
        actions: vec![NotificationAction {
            identifier: SNOOZE_ACTION_ID.to_owned(),
            title: SNOOZE_ACTION_TITLE.to_owned(),
        }],
    }]
}

/// A request that has fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredNotification {
    pub request: NotificationRequest,
    pub date: DateTime<Local>,
}

pub const DEFAULT_ACTION_ID: &str = "default";
pub const DISMISS_ACTION_ID: &str = "dismiss";

/// The user's reaction to a delivered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationResponse {
    pub request_id: AlarmId,
    pub action_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresentationOptions {
    pub sound: bool,
    pub banner: bool,
    pub badge: bool,
}

impl PresentationOptions {
    pub fn sound_only() -> Self {
        Self {
            sound: true,
            ..Self::default()
        }
    }
}
