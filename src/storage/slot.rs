use std::sync::Arc;

use tokio::sync::broadcast;

use crate::alarm::Alarm;

use super::AlarmStorage;

const UPDATES_CAPACITY: usize = 16;

/// "Alarm updated" signal, fired after every mutation of the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmUpdated;

/// The one pending alarm, if any.
///
/// Reads fail soft: a missing or unreadable backing store means nothing is
/// scheduled. Write failures are logged and otherwise swallowed, so the
/// previous value may survive a failed `set_scheduled`.
#[derive(Clone)]
pub struct ScheduledAlarmSlot {
    storage: Arc<dyn AlarmStorage>,
    updates: broadcast::Sender<AlarmUpdated>,
}

impl ScheduledAlarmSlot {
    pub fn new(storage: Arc<dyn AlarmStorage>) -> Self {
        let (updates, _) = broadcast::channel(UPDATES_CAPACITY);
        Self { storage, updates }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AlarmUpdated> {
        self.updates.subscribe()
    }

    pub async fn current_scheduled(&self) -> Option<Alarm> {
        match self.storage.load().await {
            Ok(alarm) => alarm,
            Err(e) => {
                log::debug!("Treating unreadable alarm slot as empty. [error = {e:#}]");
                None
            }
        }
    }

    pub async fn set_scheduled(&self, alarm: Option<&Alarm>) {
        let result = match alarm {
            Some(alarm) => self.storage.save(alarm).await,
            None => self.storage.clear().await,
        };

        match (result, alarm) {
            (Ok(()), Some(alarm)) => {
                log::info!("Stored scheduled alarm. [id = {}, date = {}]", alarm.id, alarm.date)
            }
            (Ok(()), None) => log::info!("Cleared scheduled alarm slot."),
            (Err(e), _) => log::error!("Failed to update scheduled alarm slot. [error = {e:#}]"),
        }

        // No subscribers is fine.
        let _ = self.updates.send(AlarmUpdated);
    }
}
