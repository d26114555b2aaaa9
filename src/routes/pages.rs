use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::db::Db;
use crate::error::AppError;
use crate::middleware::AdminUser;
use crate::models::dto::{CreatedResponse, PageRequest, SuccessResponse};
use crate::services::page_service::{PageChanges, PageService};

pub fn pages_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/pages")
            .service(list_published_pages)
            .service(get_page_by_slug)
            .service(list_all_pages)
            .service(get_page)
            .service(create_page)
            .service(update_page)
            .service(delete_page),
    );
}

/// GET /pages - Pages publiées (PUBLIC)
#[get("")]
pub async fn list_published_pages(db: web::Data<Db>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(PageService::list_published(&db).await?))
}

/// GET /pages/slug/{slug} - null si absente ou non publiée (PUBLIC)
#[get("/slug/{slug}")]
pub async fn get_page_by_slug(path: web::Path<String>, db: web::Data<Db>) -> Result<HttpResponse, AppError> {
    let page = PageService::get_published_by_slug(&db, &path).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /pages/admin - Toutes les pages, brouillons compris (ADMIN)
#[get("/admin")]
pub async fn list_all_pages(_admin: AdminUser, db: web::Data<Db>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(PageService::list_all(&db).await?))
}

/// GET /pages/admin/{id} (ADMIN)
#[get("/admin/{id}")]
pub async fn get_page(_admin: AdminUser, path: web::Path<i32>, db: web::Data<Db>) -> Result<HttpResponse, AppError> {
    let page = PageService::get_by_id(&db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// POST /pages (ADMIN)
#[post("")]
pub async fn create_page(
    admin: AdminUser,
    body: web::Json<PageRequest>,
    db: web::Data<Db>,
) -> Result<HttpResponse, AppError> {
    let changes = PageChanges::from_request(body.into_inner())?;
    let page = PageService::create(&db, changes, &admin.0.id).await?;
    Ok(HttpResponse::Ok().json(CreatedResponse {
        success: true,
        id: page.id,
    }))
}

/// PUT /pages/{id} (ADMIN)
#[put("/{id}")]
pub async fn update_page(
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<PageRequest>,
    db: web::Data<Db>,
) -> Result<HttpResponse, AppError> {
    let changes = PageChanges::from_request(body.into_inner())?;
    PageService::update(&db, path.into_inner(), changes).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
}

/// DELETE /pages/{id} (ADMIN)
#[delete("/{id}")]
pub async fn delete_page(_admin: AdminUser, path: web::Path<i32>, db: web::Data<Db>) -> Result<HttpResponse, AppError> {
    PageService::delete(&db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{cookie::Cookie, http::StatusCode, test, App};

    use super::*;
    use crate::test_support::{self, RecordingNotifier};
    use crate::utils::cookies::SESSION_COOKIE_NAME;

    #[actix_web::test]
    async fn test_admin_creates_page_visible_once_published() {
        let data = test_support::app_data(Arc::new(RecordingNotifier::default())).await;
        let token = data.gate.issue_token(&test_support::admin_identity()).unwrap();
        let app = test::init_service(
            App::new()
                .configure(|cfg| data.configure(cfg))
                .configure(pages_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/pages")
            .cookie(Cookie::new(SESSION_COOKIE_NAME, token.clone()))
            .set_json(serde_json::json!({"title": "FAQ", "slug": "faq", "content": "Questions"}))
            .to_request();
        let created: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created["success"], true);
        let id = created["id"].as_i64().unwrap();

        // Brouillon par défaut : invisible côté public
        let req = test::TestRequest::get().uri("/pages/slug/faq").to_request();
        let page: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(page.is_null());

        let req = test::TestRequest::put()
            .uri(&format!("/pages/{}", id))
            .cookie(Cookie::new(SESSION_COOKIE_NAME, token.clone()))
            .set_json(serde_json::json!({
                "title": "FAQ", "slug": "faq", "content": "Questions", "isPublished": true
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/pages/slug/faq").to_request();
        let page: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(page["title"], "FAQ");
        assert_eq!(page["createdBy"], "admin-1");

        let req = test::TestRequest::get().uri("/pages").to_request();
        let pages: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(pages.as_array().map(Vec::len), Some(1));
    }

    #[actix_web::test]
    async fn test_page_writes_require_admin() {
        let data = test_support::app_data(Arc::new(RecordingNotifier::default())).await;
        let app = test::init_service(
            App::new()
                .configure(|cfg| data.configure(cfg))
                .configure(pages_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/pages")
            .set_json(serde_json::json!({"title": "FAQ", "slug": "faq", "content": "Questions"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get().uri("/pages/admin").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }
}
