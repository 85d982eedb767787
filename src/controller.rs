use chrono::{DateTime, Utc};

use crate::{
    alarm::Alarm,
    scheduling::{AlarmScheduler, ScheduleOutcome},
};

pub const AUTHORIZATION_NEEDED_TITLE: &str = "Authorization Needed";
pub const AUTHORIZATION_NEEDED_MESSAGE: &str = concat!(
    "Alarms don't work without notifications, and it looks like you haven't granted us ",
    "permission to send you those. Please go to the Settings app and grant us ",
    "notification permissions."
);

const EMPTY_LABEL: &str = "Set an alarm below";
const SET_BUTTON_TITLE: &str = "Set Alarm";
const REMOVE_BUTTON_TITLE: &str = "Remove Alarm";
const ALARM_DATE_FORMAT: &str = "%-d/%-m/%y, %H:%M";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmViewState {
    pub label: String,
    pub button_title: &'static str,
    pub picker_enabled: bool,
}

impl AlarmViewState {
    pub fn for_alarm(alarm: Option<&Alarm>) -> Self {
        match alarm {
            Some(alarm) => Self {
                label: format!(
                    "Your alarm is scheduled for {}",
                    alarm.local_date().format(ALARM_DATE_FORMAT)
                ),
                button_title: REMOVE_BUTTON_TITLE,
                picker_enabled: false,
            },
            None => Self {
                label: EMPTY_LABEL.to_owned(),
                button_title: SET_BUTTON_TITLE,
                picker_enabled: true,
            },
        }
    }
}

/// Alert shown when alarms cannot be scheduled for lack of permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationAlert {
    pub title: &'static str,
    pub message: &'static str,
}

impl AuthorizationAlert {
    pub fn needed() -> Self {
        Self {
            title: AUTHORIZATION_NEEDED_TITLE,
            message: AUTHORIZATION_NEEDED_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Scheduled(Alarm),
    Removed(Alarm),
    AuthorizationNeeded(AuthorizationAlert),
    /// The center rejected the request; nothing was persisted.
    Failed,
}

/// Headless counterpart of the single alarm screen.
pub struct AlarmController {
    scheduler: AlarmScheduler,
}

impl AlarmController {
    pub fn new(scheduler: AlarmScheduler) -> Self {
        Self { scheduler }
    }

    pub async fn scheduled_alarm(&self) -> Option<Alarm> {
        self.scheduler.current_scheduled().await
    }

    pub async fn view_state(&self) -> AlarmViewState {
        AlarmViewState::for_alarm(self.scheduler.current_scheduled().await.as_ref())
    }

    /// Removes the scheduled alarm if there is one, otherwise schedules a new
    /// alarm at `date`.
    pub async fn toggle(&self, date: DateTime<Utc>) -> ToggleOutcome {
        if let Some(alarm) = self.scheduler.current_scheduled().await {
            self.scheduler.unschedule(&alarm).await;
            return ToggleOutcome::Removed(alarm);
        }

        let alarm = Alarm::new(date);
        match self.scheduler.schedule(&alarm).await {
            ScheduleOutcome::Scheduled => ToggleOutcome::Scheduled(alarm),
            ScheduleOutcome::PermissionDenied => {
                ToggleOutcome::AuthorizationNeeded(AuthorizationAlert::needed())
            }
            ScheduleOutcome::SubmissionFailed => ToggleOutcome::Failed,
        }
    }
}
