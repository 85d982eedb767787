use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    alarm::Alarm,
    notification::{
        AuthorizationOptions, AuthorizationStatus, NotificationCenter, NotificationRequest,
        alarm_categories,
    },
    storage::ScheduledAlarmSlot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Scheduled,
    PermissionDenied,
    SubmissionFailed,
}

impl ScheduleOutcome {
    pub fn is_granted(self) -> bool {
        matches!(self, ScheduleOutcome::Scheduled)
    }
}

/// Ties the scheduled slot to the notification center: an alarm is only
/// persisted once the center has accepted its request.
#[derive(Clone)]
pub struct AlarmScheduler {
    center: Arc<dyn NotificationCenter>,
    slot: ScheduledAlarmSlot,
}

impl AlarmScheduler {
    pub fn new(center: Arc<dyn NotificationCenter>, slot: ScheduledAlarmSlot) -> Self {
        Self { center, slot }
    }

    pub fn slot(&self) -> &ScheduledAlarmSlot {
        &self.slot
    }

    pub async fn current_scheduled(&self) -> Option<Alarm> {
        self.slot.current_scheduled().await
    }

    pub async fn register_categories(&self) {
        self.center.set_categories(alarm_categories()).await;
    }

    pub async fn schedule(&self, alarm: &Alarm) -> ScheduleOutcome {
        if !self.authorize_if_needed().await {
            log::info!(
                "Notification permission not granted, alarm not scheduled. [id = {}]",
                alarm.id
            );
            return ScheduleOutcome::PermissionDenied;
        }

        let request = NotificationRequest::for_alarm(alarm);
        if let Err(e) = self.center.add(request).await {
            log::error!(
                "Failed to submit alarm notification. [id = {}, error = {e:#}]",
                alarm.id
            );
            return ScheduleOutcome::SubmissionFailed;
        }

        self.slot.set_scheduled(Some(alarm)).await;
        ScheduleOutcome::Scheduled
    }

    /// Requests submitted under other ids stay pending.
    pub async fn unschedule(&self, alarm: &Alarm) {
        self.center
            .remove_pending(std::slice::from_ref(&alarm.id))
            .await;
        self.slot.set_scheduled(None).await;
        log::info!("Alarm unscheduled. [id = {}]", alarm.id);
    }

    /// Resubmits the persisted alarm under its stored id after a restart.
    /// An alarm whose trigger minute has already begun is dropped from the slot.
    pub async fn restore(&self, now: DateTime<Utc>) -> Option<Alarm> {
        let alarm = self.slot.current_scheduled().await?;

        // The trigger only keeps the minute, so that is what has to lie ahead.
        let fires_at = NotificationRequest::for_alarm(&alarm)
            .trigger
            .components
            .to_local();
        if !fires_at.is_some_and(|fires_at| fires_at > now) {
            log::info!(
                "Dropping stale alarm from slot. [id = {}, date = {}]",
                alarm.id,
                alarm.date
            );
            self.slot.set_scheduled(None).await;
            return None;
        }

        match self.schedule(&alarm).await {
            ScheduleOutcome::Scheduled => Some(alarm),
            outcome => {
                log::warn!(
                    "Could not restore persisted alarm. [id = {}, outcome = {outcome:?}]",
                    alarm.id
                );
                None
            }
        }
    }

    async fn authorize_if_needed(&self) -> bool {
        match self.center.authorization_status().await {
            AuthorizationStatus::Authorized => true,
            AuthorizationStatus::NotDetermined => {
                match self
                    .center
                    .request_authorization(AuthorizationOptions::all())
                    .await
                {
                    Ok(granted) => granted,
                    Err(e) => {
                        log::error!("Notification permission prompt failed. [error = {e:#}]");
                        false
                    }
                }
            }
            AuthorizationStatus::Denied
            | AuthorizationStatus::Provisional
            | AuthorizationStatus::Ephemeral => false,
        }
    }
}
