use std::sync::Arc;

use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Router};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tower::limit::GlobalConcurrencyLimitLayer;
use tracing::warn;

use crate::controller::AppState;
use crate::error::classify;
use crate::models::venue::Venue;
use crate::pipeline::VenueLookup;

/// Upstream model quotas are tight; excess lookups queue here instead of
/// burning through them.
const MAX_IN_FLIGHT_RUNS: usize = 8;

const NO_RESULTS_NOTICE: &str = "No alternative venues nearby right now.";

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/venues/", get(find_nearby_venues))
        .route("/venues/permission", get(location_permission))
        .layer(GlobalConcurrencyLimitLayer::new(MAX_IN_FLIGHT_RUNS))
        .route_layer(Extension(app_state.lookup))
}

pub async fn find_nearby_venues(
    Extension(lookup): Extension<Arc<VenueLookup>>,
) -> impl IntoResponse {
    return match lookup.run().await {
        Ok(outcome) => {
            let venues: Vec<Value> = outcome.venues.iter().map(venue_payload).collect();

            let mut body = json!({
                "venues": venues,
                "sources": outcome.sources,
            });
            if outcome.venues.is_empty() {
                body["notice"] = json!(NO_RESULTS_NOTICE);
            }

            (StatusCode::OK, body.to_string()).into_response()
        }
        Err(e) => {
            let classified = classify(&e);
            warn!("Venue lookup failed due to: {}", classified.detail);
            classified.into_response()
        }
    };
}

fn venue_payload(venue: &Venue) -> Value {
    json!({
        "name": venue.name,
        "vibe_tags": venue.vibe_tags,
        "address": venue.address,
        "rating": venue.rating,
        "rating_label": venue.rating_label(),
        "opening_hours": venue.opening_hours,
        "maps_url": venue.maps_url(),
    })
}

pub async fn location_permission(
    Extension(lookup): Extension<Arc<VenueLookup>>,
) -> impl IntoResponse {
    return match lookup.permission_state() {
        Some(state) => (
            StatusCode::OK,
            json!({ "monitored": true, "state": state }).to_string(),
        )
            .into_response(),
        None => (
            StatusCode::OK,
            json!({ "monitored": false, "state": null }).to_string(),
        )
            .into_response(),
    };
}
