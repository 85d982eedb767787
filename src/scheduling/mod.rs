mod alarm_scheduler;
mod notification_handler;

pub use alarm_scheduler::{AlarmScheduler, ScheduleOutcome};
pub use notification_handler::{AlarmNotificationHandler, run_notification_events};
