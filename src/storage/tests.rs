use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use test_strategy::proptest;

use crate::alarm::{Alarm, AlarmId};

use super::*;

fn date_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_102_444_800, 0u32..1_000_000_000)
        .prop_map(|(secs, nanos)| Utc.timestamp_opt(secs, nanos).unwrap())
}

fn alarm_at(hour: u32, minute: u32) -> Alarm {
    Alarm::new(Utc.with_ymd_and_hms(2026, 10, 19, hour, minute, 0).unwrap())
}

struct BrokenStorage;

#[async_trait]
impl AlarmStorage for BrokenStorage {
    async fn load(&self) -> anyhow::Result<Option<Alarm>> {
        anyhow::bail!("disk on fire")
    }

    async fn save(&self, _alarm: &Alarm) -> anyhow::Result<()> {
        anyhow::bail!("disk on fire")
    }

    async fn clear(&self) -> anyhow::Result<()> {
        anyhow::bail!("disk on fire")
    }
}

#[proptest]
fn encoding_round_trips(#[strategy(date_strategy())] date: DateTime<Utc>) {
    let alarm = Alarm::new(date);

    let decoded = decode(&encode(&alarm).unwrap()).unwrap();

    prop_assert_eq!(decoded, alarm);
}

#[test]
fn encoded_record_has_exactly_date_and_id() {
    let alarm = Alarm::with_id(
        Utc.with_ymd_and_hms(2026, 10, 19, 6, 45, 0).unwrap(),
        AlarmId::from("abc".to_owned()),
    );

    let value: serde_json::Value = serde_json::from_slice(&encode(&alarm).unwrap()).unwrap();

    assert_eq!(
        value,
        serde_json::json!({ "date": "2026-10-19T06:45:00Z", "id": "abc" })
    );
}

#[test]
fn decoding_rejects_extra_fields() {
    let bytes = br#"{"date":"2026-10-19T06:45:00Z","id":"abc","repeat":true}"#;

    assert!(decode(bytes).is_err());
}

#[tokio::test]
async fn file_storage_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileAlarmStorage::in_directory(dir.path());

    assert!(storage.load().await.unwrap().is_none());
    assert!(storage.path().ends_with(SCHEDULED_ALARM_FILE_NAME));
}

#[tokio::test]
async fn file_storage_save_load_clear() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileAlarmStorage::in_directory(dir.path());
    let alarm = alarm_at(7, 0);

    storage.save(&alarm).await.unwrap();
    assert_eq!(storage.load().await.unwrap(), Some(alarm));

    storage.clear().await.unwrap();
    assert!(storage.load().await.unwrap().is_none());
    assert!(!storage.path().exists());

    // Clearing twice is fine.
    storage.clear().await.unwrap();
}

#[tokio::test]
async fn file_storage_reports_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileAlarmStorage::in_directory(dir.path());
    std::fs::write(storage.path(), b"not json").unwrap();

    let err = storage.load().await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<StorageError>(),
        Some(StorageError::Decode(_))
    ));
}

#[tokio::test]
async fn slot_treats_corrupt_file_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileAlarmStorage::in_directory(dir.path());
    std::fs::write(storage.path(), b"{\"date\": 12}").unwrap();
    let slot = ScheduledAlarmSlot::new(Arc::new(storage));

    assert!(slot.current_scheduled().await.is_none());
}

#[tokio::test]
async fn slot_overwrites_previous_alarm() {
    let slot = ScheduledAlarmSlot::new(Arc::new(InMemoryAlarmStorage::new()));
    let first = alarm_at(7, 0);
    let second = alarm_at(8, 30);

    slot.set_scheduled(Some(&first)).await;
    slot.set_scheduled(Some(&second)).await;

    assert_eq!(slot.current_scheduled().await, Some(second));
}

#[tokio::test]
async fn slot_broadcasts_on_every_mutation() {
    let slot = ScheduledAlarmSlot::new(Arc::new(InMemoryAlarmStorage::new()));
    let mut updates = slot.subscribe();

    slot.set_scheduled(Some(&alarm_at(7, 0))).await;
    slot.set_scheduled(None).await;

    assert_eq!(updates.recv().await.unwrap(), AlarmUpdated);
    assert_eq!(updates.recv().await.unwrap(), AlarmUpdated);
    assert!(updates.try_recv().is_err());
}

#[tokio::test]
async fn slot_swallows_write_failures_and_still_notifies() {
    let slot = ScheduledAlarmSlot::new(Arc::new(BrokenStorage));
    let mut updates = slot.subscribe();

    slot.set_scheduled(Some(&alarm_at(7, 0))).await;

    assert!(slot.current_scheduled().await.is_none());
    assert_eq!(updates.recv().await.unwrap(), AlarmUpdated);
}

#[tokio::test]
async fn slot_survives_missing_documents_directory() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileAlarmStorage::in_directory(dir.path().join("gone"));
    let slot = ScheduledAlarmSlot::new(Arc::new(storage));

    slot.set_scheduled(Some(&alarm_at(7, 0))).await;

    assert!(slot.current_scheduled().await.is_none());
}
