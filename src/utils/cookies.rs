// Cookie de session
use actix_web::HttpRequest;
use actix_web::cookie::{Cookie, SameSite, time::Duration};

use crate::utils::jwt::SESSION_TTL_DAYS;

pub const SESSION_COOKIE_NAME: &str = "app_session_id";

/// Attributs du cookie qui dépendent de l'environnement
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub secure: bool,
}

impl CookieSettings {
    /// Cookie HttpOnly portant le token, même durée de vie que le token
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE_NAME, token)
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(Duration::days(SESSION_TTL_DAYS))
            .finish()
    }

    /// Cookie vide avec une expiration déjà passée
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(SESSION_COOKIE_NAME, "")
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .finish();
        cookie.make_removal();
        cookie
    }
}

/// Token depuis le cookie de session, sinon depuis "Authorization: Bearer"
pub fn extract_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE_NAME) {
        let value = cookie.value().trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    let header = req.headers().get("Authorization")?.to_str().ok()?;
    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))?
        .trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
