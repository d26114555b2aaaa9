// ============================================================================
// CONFIGURATION
// ============================================================================
//
// Description:
//   Toute la configuration vient des variables d'environnement (.env chargé
//   par dotenv dans main). Lue une seule fois au démarrage.
//
// Variables:
//   - HOST / PORT : adresse d'écoute (127.0.0.1:8080 par défaut)
//   - DATABASE_URL : optionnelle, sans elle les lectures renvoient du vide
//   - JWT_SECRET : obligatoire, 32 caractères minimum, jamais de valeur par défaut
//   - ADMIN_USERNAME / ADMIN_PASSWORD_HASH : obligatoires (hash pbkdf2 Werkzeug)
//   - ADMIN_ID : "admin-1" par défaut
//   - COOKIE_SECURE : "true" derrière HTTPS
//   - NOTIFICATION_API_URL / NOTIFICATION_TIMEOUT_SECS
//   - IDENTITY_PROVIDER_URL : fournisseur d'identité secondaire (optionnel)
//
// ============================================================================

use std::fmt;
use std::time::Duration;

use crate::utils::password;

pub const DEFAULT_NOTIFICATION_API_URL: &str = "https://wasenderapi.com/api/v1/send";
const MIN_SECRET_LENGTH: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Identifiants de l'unique compte admin
#[derive(Clone)]
pub struct AdminCredentials {
    pub id: String,
    pub username: String,
    pub password_hash: String,
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub admin: AdminCredentials,
    pub cookie_secure: bool,
    pub notification_api_url: String,
    pub notification_timeout: Duration,
    pub identity_provider_url: Option<String>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("jwt_secret", &"<redacted>")
            .field("admin", &self.admin)
            .field("cookie_secure", &self.cookie_secure)
            .field("notification_api_url", &self.notification_api_url)
            .field("notification_timeout", &self.notification_timeout)
            .field("identity_provider_url", &self.identity_provider_url)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construit la config à partir d'une fonction de lecture (testable sans toucher à l'env)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Une variable vide compte comme absente
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = get("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => 8080,
        };

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                reason: format!("must be at least {} characters", MIN_SECRET_LENGTH),
            });
        }

        let username = get("ADMIN_USERNAME").ok_or(ConfigError::Missing("ADMIN_USERNAME"))?;
        let password_hash = get("ADMIN_PASSWORD_HASH").ok_or(ConfigError::Missing("ADMIN_PASSWORD_HASH"))?;
        password::check_hash_format(&password_hash).map_err(|e| ConfigError::Invalid {
            name: "ADMIN_PASSWORD_HASH",
            reason: e.to_string(),
        })?;

        let cookie_secure = match get("COOKIE_SECURE").as_deref() {
            None => false,
            Some("1") | Some("true") | Some("yes") => true,
            Some("0") | Some("false") | Some("no") => false,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "COOKIE_SECURE",
                    reason: format!("expected true/false, got {}", other),
                });
            }
        };

        let notification_timeout = match get("NOTIFICATION_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                    name: "NOTIFICATION_TIMEOUT_SECS",
                    reason: e.to_string(),
                })?;
                Duration::from_secs(secs.max(1))
            }
            None => Duration::from_secs(5),
        };

        Ok(AppConfig {
            host,
            port,
            database_url: get("DATABASE_URL"),
            jwt_secret,
            admin: AdminCredentials {
                id: get("ADMIN_ID").unwrap_or_else(|| "admin-1".to_string()),
                username,
                password_hash,
            },
            cookie_secure,
            notification_api_url: get("NOTIFICATION_API_URL")
                .unwrap_or_else(|| DEFAULT_NOTIFICATION_API_URL.to_string()),
            notification_timeout,
            identity_provider_url: get("IDENTITY_PROVIDER_URL"),
        })
    }
}
