pub mod auth;
pub mod complaints;
pub mod health;
pub mod pages;
pub mod settings;

use actix_web::{error, web};

use crate::error::AppError;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Corps JSON ou query string invalides : même format d'erreur que le reste
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| error::Error::from(AppError::Validation(err.to_string())));
    let query_config = web::QueryConfig::default()
        .error_handler(|err, _req| error::Error::from(AppError::Validation(err.to_string())));

    cfg.service(
        web::scope("/api")
            .app_data(json_config)
            .app_data(query_config)
            .service(health::health_check)
            .configure(auth::auth_routes)
            .configure(complaints::complaints_routes)
            .configure(pages::pages_routes)
            .configure(settings::settings_routes),
    );
}
