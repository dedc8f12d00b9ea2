pub mod config;
pub mod errors;
pub mod models;
pub mod routes;
pub mod utils;

use crate::config::Config;
use actix_cors::Cors;
use actix_files::Files;
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use log::info;
use std::fs;
use std::path::Path;

fn create_images_folder(path: &Path) -> anyhow::Result<()> {
    // Recursive won't fail if the folders already exist
    fs::DirBuilder::new()
        .recursive(true)
        .create(path)
        .with_context(|| format!("could not create {}", path.display()))
}

fn cors(config: &Config) -> Cors {
    Cors::default()
        .allowed_origin(&config.cors_origin())
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .supports_credentials()
        .max_age(3600)
}

fn init() -> anyhow::Result<Config> {
    // A missing .env file is fine
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("actix_web=info,image_upload_service=info"),
    )
    .init();

    let config = Config::from_env()?;
    create_images_folder(&config.images_dir)?;
    Ok(config)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = init()?;
    let address = (config.host.clone(), config.port);
    info!(
        "Server running at http://{}:{}, storing images in {}",
        config.host,
        config.port,
        config.images_dir.display()
    );

    let config = web::Data::new(config);
    HttpServer::new(move || {
        App::new()
            .wrap(cors(&config))
            // enable logger - always register actix-web Logger middleware last
            .wrap(middleware::Logger::default())
            .app_data(config.clone())
            .configure(routes::register)
            // Upload form
            .service(Files::new("/", &config.static_dir).index_file("index.html"))
    })
    .bind(address)?
    .run()
    .await?;

    Ok(())
}
