use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};

use crate::{
    alarm::{Alarm, SNOOZE_ACTION_ID},
    notification::{
        DeliveredNotification, NotificationEvent, NotificationResponse, PresentationOptions,
    },
};

use super::{AlarmScheduler, ScheduleOutcome};

/// Application side of the notification center callbacks.
pub struct AlarmNotificationHandler {
    scheduler: AlarmScheduler,
}

impl AlarmNotificationHandler {
    pub fn new(scheduler: AlarmScheduler) -> Self {
        Self { scheduler }
    }

    /// Handles a user action. `completion` is signalled exactly once,
    /// whatever the action and whatever the snooze outcome.
    pub async fn did_receive(
        &self,
        response: &NotificationResponse,
        completion: oneshot::Sender<()>,
    ) {
        if response.action_id == SNOOZE_ACTION_ID {
            self.snooze(Utc::now()).await;
        } else {
            log::debug!(
                "Ignoring notification action. [id = {}, action = {}]",
                response.request_id,
                response.action_id
            );
        }

        if completion.send(()).is_err() {
            log::debug!(
                "Notification center stopped waiting for completion. [id = {}]",
                response.request_id
            );
        }
    }

    /// Schedules a fresh alarm nine minutes after `now`.
    pub async fn snooze(&self, now: DateTime<Utc>) -> (Alarm, ScheduleOutcome) {
        let alarm = Alarm::snoozed_from(now);
        let outcome = self.scheduler.schedule(&alarm).await;

        if outcome == ScheduleOutcome::PermissionDenied {
            log::warn!(
                "Can't schedule snooze because notification permissions were revoked. [id = {}]",
                alarm.id
            );
        }

        (alarm, outcome)
    }

    /// A notification is about to be shown while the app is in the
    /// foreground. The slot is cleared here even though other requests may
    /// still be pending with the center.
    pub async fn will_present(
        &self,
        notification: &DeliveredNotification,
    ) -> PresentationOptions {
        log::info!(
            "Presenting alarm in foreground. [id = {}]",
            notification.request.identifier
        );
        self.scheduler.slot().set_scheduled(None).await;
        PresentationOptions::sound_only()
    }
}

pub async fn run_notification_events(
    mut events: mpsc::Receiver<NotificationEvent>,
    handler: AlarmNotificationHandler,
) {
    while let Some(event) = events.recv().await {
        match event {
            NotificationEvent::WillPresent {
                notification,
                reply,
            } => {
                let options = handler.will_present(&notification).await;
                let _ = reply.send(options);
            }
            NotificationEvent::DidReceive {
                response,
                completion,
            } => handler.did_receive(&response, completion).await,
        }
    }

    log::info!("Notification event stream closed.");
}
