use actix_web::{get, post, web, HttpResponse};

use crate::error::AppError;
use crate::middleware::{CurrentIdentity, SessionGate};
use crate::models::dto::{LoginRequest, LoginResponse, SessionUser, SuccessResponse};
use crate::services::auth_service::AuthService;
use crate::utils::cookies::CookieSettings;

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(login)
            .service(me)
            .service(logout),
    );
}

/// POST /auth/login - Se connecter (PUBLIC)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    auth: web::Data<AuthService>,
    gate: web::Data<SessionGate>,
    cookies: web::Data<CookieSettings>,
) -> Result<HttpResponse, AppError> {
    let LoginRequest { username, password } = body.into_inner();

    // PBKDF2 bloque le thread : on le sort de la boucle async
    let identity = web::block(move || auth.authenticate(&username, &password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let token = gate.issue_token(&identity)?;
    tracing::info!(user_id = %identity.id, "admin logged in");

    Ok(HttpResponse::Ok()
        .cookie(cookies.session_cookie(token))
        .json(LoginResponse {
            success: true,
            user: identity.into(),
        }))
}

/// GET /auth/me - Utilisateur courant, ou null si anonyme
#[get("/me")]
pub async fn me(current: CurrentIdentity) -> HttpResponse {
    let user: Option<SessionUser> = current.0.map(SessionUser::from);
    HttpResponse::Ok().json(user)
}

/// POST /auth/logout - Toujours un succès, même sans session
#[post("/logout")]
pub async fn logout(cookies: web::Data<CookieSettings>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(cookies.removal_cookie())
        .json(SuccessResponse::ok())
}
