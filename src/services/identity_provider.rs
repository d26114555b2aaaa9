use actix_web::HttpRequest;
use actix_web::http::header;
use async_trait::async_trait;
use serde::Deserialize;

use crate::models::identity::{Identity, Role};

#[derive(Debug, thiserror::Error)]
pub enum IdentityProviderError {
    #[error("identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Fournisseur d'identité consulté quand la requête n'a pas de token local valide.
/// Ok(None) = requête anonyme pour ce fournisseur.
#[async_trait(?Send)]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate_request(&self, req: &HttpRequest) -> Result<Option<Identity>, IdentityProviderError>;
}

#[derive(Deserialize)]
struct RemoteUser {
    id: String,
    name: Option<String>,
    role: Option<Role>,
}

/// Transmet le header Cookie de la requête à un service externe
/// qui répond avec l'utilisateur connecté.
pub struct RemoteIdentityProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteIdentityProvider {
    pub fn new(client: reqwest::Client, endpoint: String) -> Self {
        RemoteIdentityProvider { client, endpoint }
    }
}

#[async_trait(?Send)]
impl IdentityProvider for RemoteIdentityProvider {
    async fn authenticate_request(&self, req: &HttpRequest) -> Result<Option<Identity>, IdentityProviderError> {
        let cookie_header = match req.headers().get(header::COOKIE).and_then(|v| v.to_str().ok()) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => return Ok(None),
        };

        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::COOKIE, cookie_header)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED
            || response.status() == reqwest::StatusCode::FORBIDDEN
        {
            return Ok(None);
        }

        let user: RemoteUser = response.error_for_status()?.json().await?;

        Ok(Some(Identity {
            name: user.name.unwrap_or_else(|| user.id.clone()),
            id: user.id,
            // Un compte externe n'est admin que si le fournisseur le dit
            role: user.role.unwrap_or(Role::User),
        }))
    }
}
