use subtle::ConstantTimeEq;

use crate::config::AdminCredentials;
use crate::error::AppError;
use crate::models::identity::{Identity, Role};
use crate::utils::password;

/// Vérifie les identifiants de l'unique compte admin.
/// Pas de table users : le compte est défini par la configuration.
pub struct AuthService {
    admin: AdminCredentials,
}

impl AuthService {
    pub fn new(admin: AdminCredentials) -> Self {
        AuthService { admin }
    }

    /// Le hash est toujours calculé, même si le nom d'utilisateur est faux,
    /// et les deux échecs renvoient la même erreur.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Identity, AppError> {
        let username_ok: bool = username.as_bytes().ct_eq(self.admin.username.as_bytes()).into();

        let password_ok = match password::verify_password(password, &self.admin.password_hash) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::error!(error = %e, "admin password hash cannot be verified");
                false
            }
        };

        if username_ok && password_ok {
            Ok(self.admin_identity())
        } else {
            tracing::info!("failed admin login attempt");
            Err(AppError::InvalidCredentials)
        }
    }

    pub fn admin_identity(&self) -> Identity {
        Identity {
            id: self.admin.id.clone(),
            name: self.admin.username.clone(),
            role: Role::Admin,
        }
    }
}
