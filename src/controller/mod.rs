use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use axum::Router;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::Config;
use crate::helpers::handler_404::page_not_found_handler;
use crate::pipeline::VenueLookup;

pub mod health_check;
pub mod venues_controller;

#[derive(Clone)]
pub struct AppState {
    pub lookup: Arc<VenueLookup>,
}

pub async fn serve(lookup: Arc<VenueLookup>, config: &Config) -> anyhow::Result<()> {
    let origins = config
        .origin_urls
        .split(',')
        .map(|origin| origin.trim().parse::<HeaderValue>())
        .collect::<Result<Vec<HeaderValue>, _>>()
        .context("Invalid origin in ORIGIN_URLS")?;

    let application = router_endpoints(AppState { lookup }).layer(
        ServiceBuilder::new()
            .layer(
                CorsLayer::new()
                    .allow_methods([Method::GET, Method::OPTIONS])
                    .allow_origin(origins)
                    .allow_headers([AUTHORIZATION, CONTENT_TYPE]),
            )
            .layer(CompressionLayer::new()),
    );

    let address = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("API server listening on port: {}", address.port());
    axum::Server::bind(&address)
        .serve(application.into_make_service())
        .await
        .context("Error spinning up the API server")
}

pub fn router_endpoints(app_state: AppState) -> Router {
    health_check::router()
        .merge(venues_controller::router(app_state))
        .fallback(page_not_found_handler)
}
