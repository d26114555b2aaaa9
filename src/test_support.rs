// Outils partagés par les tests (SQLite en mémoire, faux notifier, admin de test)
use std::sync::{Arc, Mutex};

use actix_web::web;
use async_trait::async_trait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::config::AdminCredentials;
use crate::db::{self, Db};
use crate::middleware::SessionGate;
use crate::models::identity::{Identity, Role};
use crate::services::auth_service::AuthService;
use crate::services::identity_provider::IdentityProvider;
use crate::services::notification_service::{
    NotificationConfigChanges, NotificationService, NotificationTarget, Notifier, NotifyError,
};
use crate::state::AppData;
use crate::utils::cookies::CookieSettings;
use crate::utils::jwt::TokenSigner;
use crate::utils::password;

pub const TEST_SECRET: &[u8] = b"test-secret-with-at-least-32-characters!";

/// Base neuve pour chaque test : une seule connexion, sinon chaque
/// connexion du pool verrait sa propre base en mémoire
pub async fn memory_db() -> Db {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let connection = Database::connect(options).await.unwrap();
    db::ensure_schema(&connection).await.unwrap();
    Db::from_connection(connection)
}

pub async fn enable_notifications(conn: &DatabaseConnection) {
    NotificationService::save_config(
        conn,
        NotificationConfigChanges {
            api_key: Some("test-api-key".to_string()),
            api_url: None,
            phone_number: Some("+201001234567".to_string()),
            is_enabled: true,
        },
    )
    .await
    .unwrap();
}

/// Admin "Harth" / "Harth12", hash avec peu d'itérations pour garder les tests rapides
pub fn admin_credentials() -> AdminCredentials {
    AdminCredentials {
        id: "admin-1".to_string(),
        username: "Harth".to_string(),
        password_hash: password::hash_password_with_iterations("Harth12", 1_000).unwrap(),
    }
}

pub fn admin_identity() -> Identity {
    Identity {
        id: "admin-1".to_string(),
        name: "Harth".to_string(),
        role: Role::Admin,
    }
}

pub fn session_gate(fallback: Option<Arc<dyn IdentityProvider>>) -> SessionGate {
    SessionGate::new(TokenSigner::new(TEST_SECRET), fallback)
}

/// Notifier qui garde les appels en mémoire
#[derive(Default)]
pub struct RecordingNotifier {
    fail: bool,
    calls: Mutex<Vec<(NotificationTarget, String)>>,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        RecordingNotifier {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(NotificationTarget, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, target: &NotificationTarget, message: &str) -> Result<(), NotifyError> {
        self.calls.lock().unwrap().push((target.clone(), message.to_string()));
        if self.fail {
            return Err(NotifyError::Rejected {
                status: 500,
                body: "upstream error".to_string(),
            });
        }
        Ok(())
    }
}

pub async fn app_data(notifier: Arc<RecordingNotifier>) -> AppData {
    app_data_with_db(memory_db().await, notifier)
}

pub fn app_data_with_db(db: Db, notifier: Arc<RecordingNotifier>) -> AppData {
    AppData {
        db: web::Data::new(db),
        gate: web::Data::new(session_gate(None)),
        auth: web::Data::new(AuthService::new(admin_credentials())),
        notifications: web::Data::new(NotificationService::new(
            notifier,
            "https://notify.example/send".to_string(),
        )),
        cookies: web::Data::new(CookieSettings { secure: false }),
    }
}
