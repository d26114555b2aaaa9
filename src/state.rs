use std::sync::Arc;

use actix_web::web;

use crate::config::AppConfig;
use crate::db::Db;
use crate::middleware::SessionGate;
use crate::services::auth_service::AuthService;
use crate::services::identity_provider::{IdentityProvider, RemoteIdentityProvider};
use crate::services::notification_service::{HttpNotifier, NotificationService};
use crate::utils::cookies::CookieSettings;
use crate::utils::jwt::TokenSigner;

/// Tout ce que les handlers reçoivent via web::Data
#[derive(Clone)]
pub struct AppData {
    pub db: web::Data<Db>,
    pub gate: web::Data<SessionGate>,
    pub auth: web::Data<AuthService>,
    pub notifications: web::Data<NotificationService>,
    pub cookies: web::Data<CookieSettings>,
}

impl AppData {
    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(config.notification_timeout)
            .build()?;

        let fallback = config.identity_provider_url.clone().map(|url| {
            Arc::new(RemoteIdentityProvider::new(http_client.clone(), url)) as Arc<dyn IdentityProvider>
        });

        let notifier = HttpNotifier::new(config.notification_timeout)?;

        Ok(AppData {
            db: web::Data::new(Db::new(config.database_url.clone())),
            gate: web::Data::new(SessionGate::new(
                TokenSigner::new(config.jwt_secret.as_bytes()),
                fallback,
            )),
            auth: web::Data::new(AuthService::new(config.admin.clone())),
            notifications: web::Data::new(NotificationService::new(
                Arc::new(notifier),
                config.notification_api_url.clone(),
            )),
            cookies: web::Data::new(CookieSettings {
                secure: config.cookie_secure,
            }),
        })
    }

    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.db.clone())
            .app_data(self.gate.clone())
            .app_data(self.auth.clone())
            .app_data(self.notifications.clone())
            .app_data(self.cookies.clone());
    }
}
