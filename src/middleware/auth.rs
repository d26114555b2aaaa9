use std::sync::Arc;

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{FutureExt, LocalBoxFuture};

use crate::error::AppError;
use crate::models::identity::Identity;
use crate::services::identity_provider::IdentityProvider;
use crate::utils::cookies;
use crate::utils::jwt::TokenSigner;

/// Résout l'identité d'une requête : token local d'abord,
/// puis le fournisseur d'identité secondaire s'il est configuré.
pub struct SessionGate {
    signer: TokenSigner,
    fallback: Option<Arc<dyn IdentityProvider>>,
}

impl SessionGate {
    pub fn new(signer: TokenSigner, fallback: Option<Arc<dyn IdentityProvider>>) -> Self {
        SessionGate { signer, fallback }
    }

    pub fn issue_token(&self, identity: &Identity) -> Result<String, AppError> {
        self.signer.issue(identity)
    }

    pub fn verify_token(&self, token: &str) -> Option<Identity> {
        self.signer.verify(token)
    }

    pub async fn resolve_request_identity(&self, req: &HttpRequest) -> Option<Identity> {
        if let Some(identity) = cookies::extract_token(req).and_then(|token| self.verify_token(&token)) {
            return Some(identity);
        }

        let provider = self.fallback.as_ref()?;
        match provider.authenticate_request(req).await {
            Ok(identity) => identity,
            // L'authentification est optionnelle pour les routes publiques :
            // une panne du fournisseur rend la requête anonyme
            Err(e) => {
                tracing::warn!(error = %e, "identity provider failed, request treated as anonymous");
                None
            }
        }
    }
}

async fn resolve(req: HttpRequest) -> Result<Option<Identity>, AppError> {
    let gate = req
        .app_data::<web::Data<SessionGate>>()
        .cloned()
        .ok_or_else(|| AppError::Internal("SessionGate is not registered".to_string()))?;
    Ok(gate.resolve_request_identity(&req).await)
}

/// Identité optionnelle, pour les routes publiques (auth.me)
pub struct CurrentIdentity(pub Option<Identity>);

impl FromRequest for CurrentIdentity {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        resolve(req.clone()).map(|result| result.map(CurrentIdentity)).boxed_local()
    }
}

/// Extracteur des routes privilégiées : refuse toute requête sans identité admin,
/// avant que le handler ne s'exécute.
pub struct AdminUser(pub Identity);

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        resolve(req.clone())
            .map(|result| match result? {
                Some(identity) if identity.is_admin() => Ok(AdminUser(identity)),
                _ => Err(AppError::PermissionDenied),
            })
            .boxed_local()
    }
}
