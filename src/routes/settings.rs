use actix_web::{get, put, web, HttpResponse};

use crate::db::Db;
use crate::error::AppError;
use crate::middleware::AdminUser;
use crate::models::dto::{NotificationConfigRequest, NotificationConfigResponse};
use crate::services::notification_service::{NotificationConfigChanges, NotificationService};

pub fn settings_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/settings")
            .service(get_notification_config)
            .service(set_notification_config),
    );
}

/// GET /settings/notifications (ADMIN) - null tant que rien n'est configuré
#[get("/notifications")]
pub async fn get_notification_config(_admin: AdminUser, db: web::Data<Db>) -> Result<HttpResponse, AppError> {
    let Some(conn) = db.get().await else {
        return Ok(HttpResponse::Ok().json(None::<NotificationConfigResponse>));
    };

    let config = NotificationService::get_config(conn)
        .await?
        .map(NotificationConfigResponse::from);
    Ok(HttpResponse::Ok().json(config))
}

/// PUT /settings/notifications (ADMIN)
#[put("/notifications")]
pub async fn set_notification_config(
    admin: AdminUser,
    body: web::Json<NotificationConfigRequest>,
    db: web::Data<Db>,
) -> Result<HttpResponse, AppError> {
    let changes = NotificationConfigChanges::from_request(body.into_inner())?;
    let conn = db.require().await?;

    let saved = NotificationService::save_config(conn, changes).await?;
    tracing::info!(by = %admin.0.id, enabled = saved.is_enabled, "notification config updated");
    Ok(HttpResponse::Ok().json(NotificationConfigResponse::from(saved)))
}
