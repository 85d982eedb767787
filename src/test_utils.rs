use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{
    alarm::AlarmId,
    notification::{
        AuthorizationOptions, AuthorizationStatus, NotificationCategory, NotificationCenter,
        NotificationRequest,
    },
    scheduling::AlarmScheduler,
    storage::{InMemoryAlarmStorage, ScheduledAlarmSlot},
};

#[derive(Default)]
pub struct CenterCalls {
    pub prompts: usize,
    pub added: Vec<NotificationRequest>,
    pub removed: Vec<AlarmId>,
    pub categories: Vec<NotificationCategory>,
}

/// Notification center double with a fixed authorization state that records
/// every call it receives.
pub struct RecordingNotificationCenter {
    pub status: Mutex<AuthorizationStatus>,
    pub grant_on_prompt: bool,
    pub fail_submissions: bool,
    pub calls: Arc<Mutex<CenterCalls>>,
}

impl RecordingNotificationCenter {
    pub fn with_status(status: AuthorizationStatus) -> Self {
        Self {
            status: Mutex::new(status),
            grant_on_prompt: true,
            fail_submissions: false,
            calls: Arc::new(Mutex::new(CenterCalls::default())),
        }
    }

    pub fn authorized() -> Self {
        Self::with_status(AuthorizationStatus::Authorized)
    }

    pub fn denying_prompt() -> Self {
        Self {
            grant_on_prompt: false,
            ..Self::with_status(AuthorizationStatus::NotDetermined)
        }
    }

    pub fn failing_submissions() -> Self {
        Self {
            fail_submissions: true,
            ..Self::authorized()
        }
    }
}

#[async_trait]
impl NotificationCenter for RecordingNotificationCenter {
    async fn authorization_status(&self) -> AuthorizationStatus {
        *self.status.lock().unwrap()
    }

    async fn request_authorization(&self, _options: AuthorizationOptions) -> anyhow::Result<bool> {
        self.calls.lock().unwrap().prompts += 1;
        let mut status = self.status.lock().unwrap();
        *status = if self.grant_on_prompt {
            AuthorizationStatus::Authorized
        } else {
            AuthorizationStatus::Denied
        };
        Ok(self.grant_on_prompt)
    }

    async fn add(&self, request: NotificationRequest) -> anyhow::Result<()> {
        if self.fail_submissions {
            anyhow::bail!("center rejected request");
        }
        self.calls.lock().unwrap().added.push(request);
        Ok(())
    }

    async fn remove_pending(&self, identifiers: &[AlarmId]) {
        self.calls
            .lock()
            .unwrap()
            .removed
            .extend(identifiers.iter().cloned());
    }

    async fn set_categories(&self, categories: Vec<NotificationCategory>) {
        self.calls.lock().unwrap().categories = categories;
    }
}

pub struct TestContext {
    pub center: Arc<RecordingNotificationCenter>,
    pub slot: ScheduledAlarmSlot,
    pub scheduler: AlarmScheduler,
}

impl TestContext {
    pub fn new(center: RecordingNotificationCenter) -> Self {
        let center = Arc::new(center);
        let slot = ScheduledAlarmSlot::new(Arc::new(InMemoryAlarmStorage::new()));
        let scheduler = AlarmScheduler::new(center.clone(), slot.clone());

        Self {
            center,
            slot,
            scheduler,
        }
    }

    pub fn calls(&self) -> std::sync::MutexGuard<'_, CenterCalls> {
        self.center.calls.lock().unwrap()
    }
}
