mod alarm_storage;
mod model;
mod slot;

pub use alarm_storage::{
    AlarmStorage, FileAlarmStorage, InMemoryAlarmStorage, SCHEDULED_ALARM_FILE_NAME, StorageError,
};
pub use model::{StoredAlarm, decode, encode};
pub use slot::{AlarmUpdated, ScheduledAlarmSlot};

#[cfg(test)]
mod tests;
