mod catalog;
mod relay;
mod view_cache;

use crate::view_cache::ViewCache;
use axum::extract::DefaultBodyLimit;
use env_logger::Env;
use log::{error, info};
use serde::Deserialize;
use std::process::exit;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_redoc::{Redoc, Servable};

fn get_default_port() -> u16 {
    8080
}

#[derive(Deserialize, Debug)]
struct Config {
    #[serde(default = "get_default_port")]
    port: u16,
    grading_url: String,
}

#[derive(Debug, Clone)]
struct AppState {
    cache: Arc<ViewCache>,
    config: Arc<Config>,
}

#[derive(OpenApi)]
#[openapi(info(description = "Student learning portal API: course catalog, assignments and submissions"))]
struct ApiDoc;

// Matches the upload cap advertised to students.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

fn app(state: AppState) -> axum::Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(catalog::list_courses))
        .routes(routes!(catalog::list_assignments))
        .routes(routes!(catalog::get_assignment))
        .routes(routes!(relay::submit_assignment))
        .split_for_parts();

    router
        .merge(Redoc::with_url("/redoc", api))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

async fn run() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let config = envy::from_env::<Config>()?;

    info!("Starting on port {}", config.port);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    axum::serve(
        listener,
        app(AppState {
            cache: Arc::new(ViewCache::default()),
            config: Arc::new(config),
        }),
    )
    .await?;

    Ok(())
}

fn main() {
    let rt = tokio::runtime::Runtime::new().unwrap();

    if let Err(err) = rt.block_on(run()) {
        error!("{}", err);
        exit(1)
    }
}
