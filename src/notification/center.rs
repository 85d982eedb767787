use async_trait::async_trait;

use crate::alarm::AlarmId;

use super::{NotificationCategory, NotificationRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    NotDetermined,
    Denied,
    Authorized,
    Provisional,
    Ephemeral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationOptions {
    pub alert: bool,
    pub badge: bool,
    pub sound: bool,
}

impl AuthorizationOptions {
    pub fn all() -> Self {
        Self {
            alert: true,
            badge: true,
            sound: true,
        }
    }
}

/// The system service that owns delivery timing of local notifications.
#[async_trait]
pub trait NotificationCenter: Send + Sync + 'static {
    async fn authorization_status(&self) -> AuthorizationStatus;

    /// Prompts the user. Resolves once they answer, with whether they granted.
    async fn request_authorization(&self, options: AuthorizationOptions) -> anyhow::Result<bool>;

    async fn add(&self, request: NotificationRequest) -> anyhow::Result<()>;

    /// Unknown identifiers are ignored.
    async fn remove_pending(&self, identifiers: &[AlarmId]);

    async fn set_categories(&self, categories: Vec<NotificationCategory>);
}
