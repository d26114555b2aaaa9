use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc, Duration};

use crate::error::AppError;
use crate::models::identity::{Identity, Role};

/// Durée de vie d'un token de session
pub const SESSION_TTL_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,     // identity id
    pub name: String,    // nom affiché
    pub role: Role,
    pub iat: i64,
    pub exp: i64,        // expiration timestamp
}

/// Signe et vérifie les tokens de session (HS256).
/// Le secret est chargé une seule fois au démarrage (voir AppConfig).
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Pas de tolérance : un token expiré est refusé immédiatement
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        TokenSigner {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::days(SESSION_TTL_DAYS),
        }
    }

    /// Génère un token pour une identité, valable SESSION_TTL_DAYS jours
    pub fn issue(&self, identity: &Identity) -> Result<String, AppError> {
        self.issue_at(identity, Utc::now())
    }

    pub fn issue_at(&self, identity: &Identity, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let expiration = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal("Failed to calculate expiration".to_string()))?;

        let claims = Claims {
            sub: identity.id.clone(),
            name: identity.name.clone(),
            role: identity.role,
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Vérifie signature et expiration.
    /// Token mal formé, expiré ou falsifié : None, jamais d'erreur.
    pub fn verify(&self, token: &str) -> Option<Identity> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(Identity {
                id: data.claims.sub,
                name: data.claims.name,
                role: data.claims.role,
            }),
            Err(e) => {
                tracing::debug!(error = %e, "session token rejected");
                None
            }
        }
    }
}
