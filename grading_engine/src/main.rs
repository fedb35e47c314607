mod gemini;
mod routes;

use axum::extract::DefaultBodyLimit;
use env_logger::Env;
use log::{error, info};
use serde::Deserialize;
use std::process::exit;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_redoc::Redoc;
use utoipa_redoc::Servable;

fn get_default_port() -> u16 {
    8080
}

fn get_default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn get_default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn get_default_assets_dir() -> String {
    "public".to_string()
}

#[derive(Deserialize, Debug)]
pub struct Config {
    #[serde(default = "get_default_port")]
    port: u16,
    gemini_api_key: String,
    #[serde(default = "get_default_gemini_base_url")]
    gemini_base_url: String,
    #[serde(default = "get_default_model")]
    model: String,
    #[serde(default = "get_default_assets_dir")]
    assets_dir: String,
}

#[derive(OpenApi)]
#[openapi(info(description = "API for grading assignment submissions using llms"))]
struct ApiDoc;

// Uploads are capped at 20 MB.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

fn app(config: Arc<Config>) -> axum::Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(routes::grade_submission))
        .split_for_parts();

    router
        .merge(Redoc::with_url("/redoc", api))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(config)
}

async fn run() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let config = envy::from_env::<Config>()?;

    info!("Starting on port {}", config.port);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    axum::serve(listener, app(Arc::new(config))).await?;

    Ok(())
}

fn main() {
    let rt = tokio::runtime::Runtime::new().unwrap();

    if let Err(err) = rt.block_on(run()) {
        error!("{}", err);
        exit(1)
    }
}
