mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod state;
mod utils;

use std::io;
use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};

use crate::config::AppConfig;
use crate::db::PgRecordStore;
use crate::state::AppState;
use crate::utils::storage::UploadStorage;

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    error!("{}: {}", context, err);
    io::Error::other(format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env().map_err(|err| startup_error("Invalid configuration", err))?;

    let storage = UploadStorage::init(&config.upload_dir)
        .await
        .map_err(|err| startup_error("Failed to create upload directory", err))?;

    let store = PgRecordStore::connect(&config.database_url)
        .await
        .map_err(|err| startup_error("Failed to connect to the database", err))?;
    store
        .ensure_schema()
        .await
        .map_err(|err| startup_error("Failed to prepare the database schema", err))?;
    info!("Connected to the database");

    let state = AppState::new(Arc::new(store), storage);
    let upload_dir = state.storage.dir().to_path_buf();

    info!(
        "Starting server at {}:{}, serving uploads from {}",
        config.host,
        config.port,
        upload_dir.display()
    );

    HttpServer::new(move || {
        let upload_dir = upload_dir.clone();
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(move |cfg| handlers::routes(cfg, &upload_dir))
    })
    .bind(config.bind_address())?
    .run()
    .await
}
