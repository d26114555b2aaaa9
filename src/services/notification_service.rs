use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use sea_orm::*;
use serde::Serialize;

use crate::error::AppError;
use crate::models::complaints;
use crate::models::dto::NotificationConfigRequest;
use crate::models::notification_config::{self, SINGLETON_ID};

const MISSING_VALUE: &str = "non précisé";

/// Destination d'une notification, construite depuis la config stockée
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationTarget {
    pub api_url: String,
    pub api_key: String,
    pub phone_number: String,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("notification API answered {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Canal de sortie des notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, target: &NotificationTarget, message: &str) -> Result<(), NotifyError>;
}

#[derive(Serialize)]
struct SendMessageBody<'a> {
    phone: &'a str,
    message: &'a str,
}

/// Envoie un POST JSON {phone, message} avec la clé API en Bearer
pub struct HttpNotifier {
    client: reqwest::Client,
}

impl HttpNotifier {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpNotifier { client })
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send(&self, target: &NotificationTarget, message: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&target.api_url)
            .bearer_auth(&target.api_key)
            .json(&SendMessageBody {
                phone: &target.phone_number,
                message,
            })
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(NotifyError::Rejected { status, body })
    }
}

/// Pourquoi aucune notification n'a été tentée
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotConfigured,
    Disabled,
    MissingApiKey,
    MissingPhoneNumber,
    DatabaseUnavailable,
}

/// Résultat de la notification. Aucun cas n'est une erreur pour l'appelant.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationOutcome {
    Sent,
    Skipped(SkipReason),
    Failed(String),
}

/// Partial update de la config : None = valeur stockée inchangée
#[derive(Debug, Clone, Default)]
pub struct NotificationConfigChanges {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub phone_number: Option<String>,
    pub is_enabled: bool,
}

impl NotificationConfigChanges {
    pub fn from_request(request: NotificationConfigRequest) -> Result<Self, AppError> {
        if let Some(url) = request.api_url.as_deref() {
            if !url.is_empty() && !is_http_url(url) {
                return Err(AppError::Validation("Invalid API URL".to_string()));
            }
        }

        Ok(NotificationConfigChanges {
            api_key: request.api_key,
            api_url: request.api_url,
            phone_number: request.phone_number,
            is_enabled: request.is_enabled,
        })
    }

    fn apply(self, model: &mut notification_config::ActiveModel) {
        if let Some(api_key) = self.api_key {
            model.api_key = Set(Some(api_key));
        }
        if let Some(api_url) = self.api_url {
            model.api_url = Set(Some(api_url));
        }
        if let Some(phone_number) = self.phone_number {
            model.phone_number = Set(Some(phone_number));
        }
        model.is_enabled = Set(self.is_enabled);
    }
}

/// URL absolue http(s) avec un hôte
fn is_http_url(url: &str) -> bool {
    match reqwest::Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some(),
        Err(_) => false,
    }
}

pub struct NotificationService {
    notifier: Arc<dyn Notifier>,
    default_api_url: String,
}

impl NotificationService {
    pub fn new(notifier: Arc<dyn Notifier>, default_api_url: String) -> Self {
        NotificationService {
            notifier,
            default_api_url,
        }
    }

    pub async fn get_config(db: &DatabaseConnection) -> Result<Option<notification_config::Model>, DbErr> {
        notification_config::Entity::find_by_id(SINGLETON_ID).one(db).await
    }

    /// Crée ou met à jour l'unique ligne de config (id = SINGLETON_ID)
    pub async fn save_config(
        db: &DatabaseConnection,
        changes: NotificationConfigChanges,
    ) -> Result<notification_config::Model, DbErr> {
        match Self::get_config(db).await? {
            Some(existing) => {
                let mut active: notification_config::ActiveModel = existing.into();
                changes.apply(&mut active);
                active.update(db).await
            }
            None => {
                let mut active = notification_config::ActiveModel {
                    id: Set(SINGLETON_ID),
                    api_key: Set(None),
                    api_url: Set(None),
                    phone_number: Set(None),
                    ..Default::default()
                };
                changes.apply(&mut active);
                active.insert(db).await
            }
        }
    }

    /// Décide si une notification doit partir, et vers où
    pub fn resolve_target(
        &self,
        config: Option<&notification_config::Model>,
    ) -> Result<NotificationTarget, SkipReason> {
        let config = config.ok_or(SkipReason::NotConfigured)?;
        if !config.is_enabled {
            return Err(SkipReason::Disabled);
        }

        let api_key = non_empty(config.api_key.as_deref()).ok_or(SkipReason::MissingApiKey)?;
        let phone_number = non_empty(config.phone_number.as_deref()).ok_or(SkipReason::MissingPhoneNumber)?;
        let api_url = non_empty(config.api_url.as_deref()).unwrap_or(&self.default_api_url);

        Ok(NotificationTarget {
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            phone_number: phone_number.to_string(),
        })
    }

    /// Notification best-effort après création d'une réclamation.
    /// Toujours un NotificationOutcome, jamais une erreur.
    pub async fn notify_new_complaint(
        &self,
        db: Option<&DatabaseConnection>,
        complaint: &complaints::Model,
    ) -> NotificationOutcome {
        let Some(db) = db else {
            return NotificationOutcome::Skipped(SkipReason::DatabaseUnavailable);
        };

        let config = match Self::get_config(db).await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(complaint_id = complaint.id, error = %e, "cannot read notification config");
                return NotificationOutcome::Failed(e.to_string());
            }
        };

        let target = match self.resolve_target(config.as_ref()) {
            Ok(target) => target,
            Err(reason) => {
                tracing::debug!(complaint_id = complaint.id, ?reason, "notification skipped");
                return NotificationOutcome::Skipped(reason);
            }
        };

        let message = compose_message(complaint);
        match self.notifier.send(&target, &message).await {
            Ok(()) => {
                tracing::info!(complaint_id = complaint.id, "notification sent");
                NotificationOutcome::Sent
            }
            Err(e) => {
                tracing::warn!(complaint_id = complaint.id, error = %e, "notification failed");
                NotificationOutcome::Failed(e.to_string())
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Message texte envoyé à l'admin pour une nouvelle réclamation
pub fn compose_message(complaint: &complaints::Model) -> String {
    let email = non_empty(complaint.email.as_deref()).unwrap_or(MISSING_VALUE);
    let phone = non_empty(complaint.phone.as_deref()).unwrap_or(MISSING_VALUE);
    let date = complaint
        .created_at
        .with_timezone(&Local)
        .format("%d/%m/%Y %H:%M:%S");

    format!(
        "🔔 Nouvelle réclamation\n\n\
         📝 Objet : {}\n\
         👤 Nom : {}\n\
         📧 E-mail : {}\n\
         📱 Téléphone : {}\n\
         💬 Message : {}\n\n\
         ⏰ Date : {}",
        complaint.subject, complaint.name, email, phone, complaint.message, date
    )
}
