mod cli;
mod config;
mod db;
mod error;
mod logging;
mod middleware;
mod models;
mod routes;
mod services;
mod state;
mod utils;

#[cfg(test)]
mod test_support;

use actix_web::{middleware::Logger, App, HttpServer};
use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::state::AppData;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Cli::parse();
    if let Some(Commands::HashPassword { password, iterations }) = args.command {
        let hash = cli::hash_password_command(password, iterations, std::io::stdin().lock())?;
        println!("{}", hash);
        return Ok(());
    }

    dotenv::dotenv().ok();
    logging::init_logging();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
        std::io::Error::other(e)
    })?;
    tracing::debug!(?config, "configuration loaded");

    let data = AppData::from_config(&config).map_err(std::io::Error::other)?;

    // Premier essai de connexion : sans base, le service démarre quand même
    tracing::info!("connecting to database...");
    if data.db.get().await.is_some() {
        tracing::info!("database connected");
    } else {
        tracing::warn!("database unavailable, reads will be empty and writes will fail");
    }

    tracing::info!(host = %config.host, port = config.port, "starting server");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| data.configure(cfg))
            .configure(routes::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
