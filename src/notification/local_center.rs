use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use chrono::Local;
use tokio::sync::{Mutex, RwLock, mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::{alarm::AlarmId, appsettings::NotificationSettings};

use super::{
    AuthorizationOptions, AuthorizationStatus, DeliveredNotification, NotificationCategory,
    NotificationCenter, NotificationRequest, NotificationResponse, PresentationOptions,
};

const EVENTS_CAPACITY: usize = 16;

/// Callbacks the center hands to the application. Each carries the handle
/// the application must answer exactly once.
#[derive(Debug)]
pub enum NotificationEvent {
    WillPresent {
        notification: DeliveredNotification,
        reply: oneshot::Sender<PresentationOptions>,
    },
    DidReceive {
        response: NotificationResponse,
        completion: oneshot::Sender<()>,
    },
}

struct PendingRequest {
    generation: u64,
    cancellation_token: CancellationToken,
}

impl PendingRequest {
    fn cancel(self) {
        self.cancellation_token.cancel();
    }
}

type PendingStore = Arc<Mutex<HashMap<AlarmId, PendingRequest>>>;

/// Notification center that lives inside the process: pending requests are
/// tokio tasks sleeping until their trigger date.
pub struct LocalNotificationCenter {
    status: RwLock<AuthorizationStatus>,
    grant_on_prompt: bool,
    present_in_foreground: bool,
    categories: RwLock<Vec<NotificationCategory>>,
    pending: PendingStore,
    next_generation: AtomicU64,
    events: mpsc::Sender<NotificationEvent>,
}

impl LocalNotificationCenter {
    pub fn new(settings: &NotificationSettings) -> (Self, mpsc::Receiver<NotificationEvent>) {
        let (events, rx) = mpsc::channel(EVENTS_CAPACITY);
        let center = Self {
            status: RwLock::new(AuthorizationStatus::NotDetermined),
            grant_on_prompt: settings.grant_authorization,
            present_in_foreground: settings.present_in_foreground,
            categories: RwLock::new(Vec::new()),
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
            events,
        };

        (center, rx)
    }

    pub async fn pending_identifiers(&self) -> Vec<AlarmId> {
        self.pending.lock().await.keys().cloned().collect()
    }

    pub async fn categories(&self) -> Vec<NotificationCategory> {
        self.categories.read().await.clone()
    }

    /// Delivers a user action on a notification. The returned receiver
    /// resolves once the application has signalled completion.
    pub async fn respond(
        &self,
        response: NotificationResponse,
    ) -> anyhow::Result<oneshot::Receiver<()>> {
        let (completion, done) = oneshot::channel();
        self.events
            .send(NotificationEvent::DidReceive {
                response,
                completion,
            })
            .await
            .map_err(|_| anyhow::anyhow!("Notification event receiver is gone"))?;

        Ok(done)
    }

    async fn remove_one(&self, identifier: &AlarmId) {
        if let Some(previous) = self.pending.lock().await.remove(identifier) {
            log::debug!("Removed pending notification request. [id = {identifier}]");
            previous.cancel();
        }
    }
}

#[async_trait]
impl NotificationCenter for LocalNotificationCenter {
    async fn authorization_status(&self) -> AuthorizationStatus {
        *self.status.read().await
    }

    async fn request_authorization(&self, options: AuthorizationOptions) -> anyhow::Result<bool> {
        let mut status = self.status.write().await;
        if *status == AuthorizationStatus::NotDetermined {
            *status = if self.grant_on_prompt {
                AuthorizationStatus::Authorized
            } else {
                AuthorizationStatus::Denied
            };
            log::info!(
                "Answered notification permission prompt. [status = {:?}, options = {:?}]",
                *status,
                options
            );
        }

        Ok(*status == AuthorizationStatus::Authorized)
    }

    async fn add(&self, request: NotificationRequest) -> anyhow::Result<()> {
        let identifier = request.identifier.clone();
        let fire_at = request.trigger.components.to_local().ok_or_else(|| {
            anyhow::anyhow!(
                "Trigger date does not exist in the local calendar. [components = {:?}]",
                request.trigger.components
            )
        })?;

        let Ok(delay) = (fire_at - Local::now()).to_std() else {
            log::warn!(
                "Accepted notification request whose trigger date has passed; it will not fire. \
                 [id = {identifier}, fire_at = {fire_at}]"
            );
            self.remove_one(&identifier).await;
            return Ok(());
        };

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let cancellation_token = CancellationToken::new();
        let task_token = cancellation_token.child_token();
        let pending = Arc::clone(&self.pending);
        let events = self.events.clone();
        let present_in_foreground = self.present_in_foreground;

        // Held until the new entry is in place, so a firing task always finds it.
        let mut pending_guard = self.pending.lock().await;

        tokio::spawn(async move {
            tokio::select! {
                _ = task_token.cancelled() => {
                    log::debug!(
                        "Pending notification request was cancelled. [id = {}]",
                        request.identifier
                    );
                },
                _ = tokio::time::sleep(delay) => {
                    {
                        let mut pending = pending.lock().await;
                        let current = pending
                            .get(&request.identifier)
                            .is_some_and(|p| p.generation == generation);
                        if current {
                            pending.remove(&request.identifier);
                        }
                    }
                    deliver(request, fire_at, present_in_foreground, &events).await;
                }
            }
        });

        let previous = pending_guard.insert(
            identifier.clone(),
            PendingRequest {
                generation,
                cancellation_token,
            },
        );
        if let Some(previous) = previous {
            log::debug!("Replaced pending notification request. [id = {identifier}]");
            previous.cancel();
        }

        log::info!("Added notification request. [id = {identifier}, fire_at = {fire_at}]");
        Ok(())
    }

    async fn remove_pending(&self, identifiers: &[AlarmId]) {
        for identifier in identifiers {
            self.remove_one(identifier).await;
        }
    }

    async fn set_categories(&self, categories: Vec<NotificationCategory>) {
        *self.categories.write().await = categories;
    }
}

impl Drop for LocalNotificationCenter {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.try_lock() {
            pending.drain().for_each(|(_, request)| request.cancel());
        }
    }
}

async fn deliver(
    request: NotificationRequest,
    fire_at: chrono::DateTime<Local>,
    present_in_foreground: bool,
    events: &mpsc::Sender<NotificationEvent>,
) {
    let id = request.identifier.clone();
    log::info!(
        "Notification fired. [id = {id}, title = {}, body = {}]",
        request.content.title,
        request.content.body
    );

    if !present_in_foreground {
        return;
    }

    let (reply, options) = oneshot::channel();
    let notification = DeliveredNotification {
        request,
        date: fire_at,
    };
    if events
        .send(NotificationEvent::WillPresent {
            notification,
            reply,
        })
        .await
        .is_err()
    {
        log::warn!("Nobody is listening for notification events. [id = {id}]");
        return;
    }

    match options.await {
        Ok(options) => log::debug!("Presenting notification. [id = {id}, options = {options:?}]"),
        Err(_) => log::warn!("Presentation handler dropped without answering. [id = {id}]"),
    }
}
