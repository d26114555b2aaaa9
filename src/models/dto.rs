//pour les requêtes et réponses de l'API
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::complaints::{ComplaintPriority, ComplaintStatus};
use crate::models::identity::{Identity, Role};
use crate::models::notification_config;

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl From<Identity> for SessionUser {
    fn from(identity: Identity) -> Self {
        SessionUser {
            id: identity.id,
            name: identity.name,
            role: identity.role,
        }
    }
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: SessionUser,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        SuccessResponse { success: true }
    }
}

// ---------------------------------------------------------------------------
// Complaints
// ---------------------------------------------------------------------------

/// Formulaire public. status/priority ne sont pas acceptés ici :
/// un champ inconnu est simplement ignoré par serde.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitComplaintRequest {
    // Champ absent = vide : la validation décide du message d'erreur
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    pub attachment_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitComplaintResponse {
    pub success: bool,
    pub id: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListComplaintsQuery {
    pub status: Option<ComplaintStatus>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ComplaintStatus,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdatePriorityRequest {
    pub priority: ComplaintPriority,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintStats {
    pub total: u64,
    pub pending: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub closed: u64,
}

impl ComplaintStats {
    /// Construit les stats à partir des comptes par statut.
    /// total est toujours la somme des quatre compteurs.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (ComplaintStatus, u64)>,
    {
        let mut stats = ComplaintStats::default();
        for (status, count) in counts {
            match status {
                ComplaintStatus::Pending => stats.pending += count,
                ComplaintStatus::InProgress => stats.in_progress += count,
                ComplaintStatus::Resolved => stats.resolved += count,
                ComplaintStatus::Closed => stats.closed += count,
            }
        }
        stats.total = stats.pending + stats.in_progress + stats.resolved + stats.closed;
        stats
    }
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

/// Utilisé pour la création ET la mise à jour (tous les champs sont réécrits)
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Slug is required"))]
    pub slug: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default = "default_true")]
    pub show_in_menu: bool,
    #[serde(default)]
    pub menu_order: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub id: i32,
}

// ---------------------------------------------------------------------------
// Notification config
// ---------------------------------------------------------------------------

/// Un champ optionnel absent laisse la valeur stockée inchangée
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationConfigRequest {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub phone_number: Option<String>,
    pub is_enabled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationConfigResponse {
    pub api_key_hint: Option<String>,
    pub api_url: Option<String>,
    pub phone_number: Option<String>,
    pub is_enabled: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<notification_config::Model> for NotificationConfigResponse {
    fn from(config: notification_config::Model) -> Self {
        NotificationConfigResponse {
            api_key_hint: config.api_key.as_deref().and_then(mask_secret),
            api_url: config.api_url,
            phone_number: config.phone_number,
            is_enabled: config.is_enabled,
            updated_at: config.updated_at,
        }
    }
}

/// Ne garde que les 4 derniers caractères d'un secret
fn mask_secret(secret: &str) -> Option<String> {
    if secret.is_empty() {
        return None;
    }
    let chars: Vec<char> = secret.chars().collect();
    let visible: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    Some(format!("****{}", visible))
}
