use actix_web::{get, web, HttpResponse};
use chrono::Utc;

use crate::db::Db;
use crate::models::health::HealthResponse;

/// Le service répond même sans base : seul le champ database change
#[get("/health")]
pub async fn health_check(db: web::Data<Db>) -> HttpResponse {
    let database = match db.get().await {
        Some(_) => "up",
        None => "unavailable",
    };

    let response = HealthResponse {
        status: "ok".to_string(),
        database: database.to_string(),
        time: Utc::now(),
    };

    HttpResponse::Ok().json(response)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{test, App};

    use super::*;
    use crate::test_support::{self, RecordingNotifier};

    #[actix_web::test]
    async fn test_health_reports_database_state() {
        let data = test_support::app_data(Arc::new(RecordingNotifier::default())).await;
        let app = test::init_service(App::new().configure(|cfg| data.configure(cfg)).service(health_check)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"], "up");

        let offline = test_support::app_data_with_db(Db::new(None), Arc::new(RecordingNotifier::default()));
        let app = test::init_service(App::new().configure(|cfg| offline.configure(cfg)).service(health_check)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["database"], "unavailable");
    }
}
