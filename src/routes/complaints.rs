use actix_web::{delete, get, patch, post, web, HttpResponse};

use crate::db::Db;
use crate::error::AppError;
use crate::middleware::AdminUser;
use crate::models::dto::{
    ListComplaintsQuery, SubmitComplaintRequest, SubmitComplaintResponse, SuccessResponse,
    UpdatePriorityRequest, UpdateStatusRequest,
};
use crate::services::complaint_service::{ComplaintFilter, ComplaintService};
use crate::services::notification_service::NotificationService;

pub fn complaints_routes(cfg: &mut web::ServiceConfig) {
    // /stats avant /{id}
    cfg.service(
        web::scope("/complaints")
            .service(submit_complaint)
            .service(list_complaints)
            .service(complaint_stats)
            .service(get_complaint)
            .service(update_status)
            .service(update_priority)
            .service(delete_complaint),
    );
}

/// POST /complaints - Formulaire public
#[post("")]
pub async fn submit_complaint(
    body: web::Json<SubmitComplaintRequest>,
    db: web::Data<Db>,
    notifications: web::Data<NotificationService>,
) -> Result<HttpResponse, AppError> {
    let outcome = ComplaintService::submit(&db, &notifications, body.into_inner()).await?;
    tracing::debug!(complaint_id = outcome.complaint.id, notification = ?outcome.notification, "submit done");

    Ok(HttpResponse::Ok().json(SubmitComplaintResponse {
        success: true,
        id: outcome.complaint.id,
    }))
}

/// GET /complaints?status=&limit=&offset= (ADMIN)
#[get("")]
pub async fn list_complaints(
    _admin: AdminUser,
    query: web::Query<ListComplaintsQuery>,
    db: web::Data<Db>,
) -> Result<HttpResponse, AppError> {
    let filter = ComplaintFilter::from_query(query.into_inner())?;
    let complaints = ComplaintService::list(&db, filter).await?;
    Ok(HttpResponse::Ok().json(complaints))
}

/// GET /complaints/stats (ADMIN)
#[get("/stats")]
pub async fn complaint_stats(_admin: AdminUser, db: web::Data<Db>) -> Result<HttpResponse, AppError> {
    let stats = ComplaintService::stats(&db).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// GET /complaints/{id} (ADMIN) - null si absente
#[get("/{id}")]
pub async fn get_complaint(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<Db>,
) -> Result<HttpResponse, AppError> {
    let complaint = ComplaintService::get_by_id(&db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(complaint))
}

/// PATCH /complaints/{id}/status (ADMIN)
#[patch("/{id}/status")]
pub async fn update_status(
    admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<UpdateStatusRequest>,
    db: web::Data<Db>,
) -> Result<HttpResponse, AppError> {
    let UpdateStatusRequest { status, notes } = body.into_inner();
    ComplaintService::update_status(&db, path.into_inner(), status, notes, &admin.0.id).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
}

/// PATCH /complaints/{id}/priority (ADMIN)
#[patch("/{id}/priority")]
pub async fn update_priority(
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<UpdatePriorityRequest>,
    db: web::Data<Db>,
) -> Result<HttpResponse, AppError> {
    ComplaintService::update_priority(&db, path.into_inner(), body.into_inner().priority).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
}

/// DELETE /complaints/{id} (ADMIN) - idempotent
#[delete("/{id}")]
pub async fn delete_complaint(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<Db>,
) -> Result<HttpResponse, AppError> {
    ComplaintService::delete(&db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{cookie::Cookie, http::StatusCode, test, App};

    use super::*;
    use crate::models::identity::{Identity, Role};
    use crate::state::AppData;
    use crate::test_support::{self, RecordingNotifier};
    use crate::utils::cookies::SESSION_COOKIE_NAME;

    fn admin_cookie(data: &AppData) -> Cookie<'static> {
        let token = data.gate.issue_token(&test_support::admin_identity()).unwrap();
        Cookie::new(SESSION_COOKIE_NAME, token)
    }

    fn form() -> serde_json::Value {
        serde_json::json!({
            "name": "Omar",
            "email": "omar@example.com",
            "subject": "Facture",
            "message": "Montant incorrect sur la facture de mars"
        })
    }

    #[actix_web::test]
    async fn test_submit_then_admin_flow() {
        let notifier = Arc::new(RecordingNotifier::default());
        let data = test_support::app_data(notifier.clone()).await;
        test_support::enable_notifications(data.db.get().await.unwrap()).await;
        let app = test::init_service(
            App::new()
                .configure(|cfg| data.configure(cfg))
                .configure(complaints_routes),
        )
        .await;

        let req = test::TestRequest::post().uri("/complaints").set_json(form()).to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        let id = body["id"].as_i64().unwrap();
        assert_eq!(notifier.calls().len(), 1);

        let req = test::TestRequest::patch()
            .uri(&format!("/complaints/{}/status", id))
            .cookie(admin_cookie(&data))
            .set_json(serde_json::json!({"status": "in_progress", "notes": "Rappel client"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/complaints/{}", id))
            .cookie(admin_cookie(&data))
            .to_request();
        let complaint: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(complaint["status"], "in_progress");
        assert_eq!(complaint["priority"], "medium");
        assert_eq!(complaint["assignedTo"], "admin-1");
        assert_eq!(complaint["notes"], "Rappel client");

        let req = test::TestRequest::get()
            .uri("/complaints/stats")
            .cookie(admin_cookie(&data))
            .to_request();
        let stats: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stats["total"], 1);
        assert_eq!(stats["inProgress"], 1);
        assert_eq!(stats["pending"], 0);

        let req = test::TestRequest::delete()
            .uri(&format!("/complaints/{}", id))
            .cookie(admin_cookie(&data))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/complaints/{}", id))
            .cookie(admin_cookie(&data))
            .to_request();
        let gone: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(gone.is_null());
    }

    #[actix_web::test]
    async fn test_submit_succeeds_when_notification_fails() {
        let notifier = Arc::new(RecordingNotifier::failing());
        let data = test_support::app_data(notifier.clone()).await;
        test_support::enable_notifications(data.db.get().await.unwrap()).await;
        let app = test::init_service(
            App::new()
                .configure(|cfg| data.configure(cfg))
                .configure(complaints_routes),
        )
        .await;

        let req = test::TestRequest::post().uri("/complaints").set_json(form()).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(notifier.calls().len(), 1);
    }

    #[actix_web::test]
    async fn test_submit_validation_error() {
        let data = test_support::app_data(Arc::new(RecordingNotifier::default())).await;
        let app = test::init_service(
            App::new()
                .configure(|cfg| data.configure(cfg))
                .configure(complaints_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/complaints")
            .set_json(serde_json::json!({"name": "Omar", "subject": "Facture", "message": "court"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"], "Message must be at least 10 characters");
    }

    #[actix_web::test]
    async fn test_missing_fields_follow_validation_order() {
        let data = test_support::app_data(Arc::new(RecordingNotifier::default())).await;
        let app = test::init_service(
            App::new()
                .configure(|cfg| data.configure(cfg))
                .configure(complaints_routes),
        )
        .await;

        // name vide et message absent : la première règle gagne
        let req = test::TestRequest::post()
            .uri("/complaints")
            .set_json(serde_json::json!({"name": "", "subject": "Facture"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Name is required");

        let req = test::TestRequest::post()
            .uri("/complaints")
            .set_json(serde_json::json!({"name": "Omar", "message": "Montant incorrect sur la facture"}))
            .to_request();
        let body: serde_json::Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["error"], "Subject is required");
    }

    #[actix_web::test]
    async fn test_admin_endpoints_reject_anonymous_and_users() {
        let data = test_support::app_data(Arc::new(RecordingNotifier::default())).await;
        let user_token = data
            .gate
            .issue_token(&Identity {
                id: "u-1".to_string(),
                name: "Client".to_string(),
                role: Role::User,
            })
            .unwrap();
        let app = test::init_service(
            App::new()
                .configure(|cfg| data.configure(cfg))
                .configure(complaints_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/complaints").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/complaints/stats")
            .cookie(Cookie::new(SESSION_COOKIE_NAME, user_token.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "PERMISSION_DENIED");

        let req = test::TestRequest::delete()
            .uri("/complaints/1")
            .insert_header(("Authorization", format!("Bearer {}", user_token)))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_update_missing_complaint_is_not_found() {
        let data = test_support::app_data(Arc::new(RecordingNotifier::default())).await;
        let app = test::init_service(
            App::new()
                .configure(|cfg| data.configure(cfg))
                .configure(complaints_routes),
        )
        .await;

        let req = test::TestRequest::patch()
            .uri("/complaints/999/priority")
            .cookie(admin_cookie(&data))
            .set_json(serde_json::json!({"priority": "urgent"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
