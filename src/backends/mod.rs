pub mod grounded;
pub mod structured;
pub mod webhook;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::Value;

use crate::config::{BackendKind, Config};
use crate::error::LookupError;
use crate::models::coordinate::Coordinates;
use crate::models::source::GroundingSource;

/// Raw venue payload as one backend produced it, plus whatever citations the
/// backend could attach. `raw` is handed to the normalizer untouched.
#[derive(Debug)]
pub struct FetchedVenues {
    pub raw: Value,
    pub sources: Vec<GroundingSource>,
}

impl FetchedVenues {
    pub fn bare(raw: Value) -> Self {
        Self {
            raw,
            sources: Vec::new(),
        }
    }
}

/// One of the interchangeable venue sources. Implementations absorb their
/// own wire quirks and hand back something array-shaped (or a taxonomy
/// error), so callers never branch on which backend answered.
#[async_trait]
pub trait VenueBackend: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    async fn fetch_venues(&self, fix: Coordinates) -> Result<FetchedVenues, LookupError>;
}

/// Shared wording for the model-based backends; each variant adds its own
/// envelope instruction on top.
pub fn venue_task(fix: Coordinates) -> String {
    format!(
        "List up to 10 alternative bars and night venues (punk, goth, metal, dive) worth \
         visiting near latitude {}, longitude {}. Every entry has the string fields \
         \"name\", \"address\" and \"opening_hours\", a \"vibe_tags\" array of short \
         lowercase strings, and a numeric \"rating\" between 0 and 5.",
        fix.latitude, fix.longitude
    )
}

/// Model replies often arrive wrapped in a Markdown code fence, with or
/// without a `json` label. Peel it off; leave unfenced text alone.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return trimmed;
    };

    inner.strip_prefix("json").unwrap_or(inner).trim()
}

/// Some sources deliver `{"bars": [...]}` instead of the bare array. Unwrap
/// that one container key and let the normalizer judge the rest.
pub fn unwrap_container(mut value: Value) -> Value {
    match value.get_mut("bars").map(Value::take) {
        Some(inner) => inner,
        None => value,
    }
}

/// Digs the reply text out of a generate-content response body.
pub fn reply_text(body: &Value) -> Result<&str, LookupError> {
    body.get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .and_then(|parts| parts.first())
        .and_then(|part| part.get("text"))
        .and_then(Value::as_str)
        .ok_or_else(|| LookupError::MalformedResponse("reply carries no text part".to_string()))
}

pub fn from_config(config: &Config, client: reqwest::Client) -> Result<Arc<dyn VenueBackend>> {
    let backend: Arc<dyn VenueBackend> = match config.venue_backend {
        BackendKind::Structured => Arc::new(structured::StructuredApi::new(
            client,
            ensure_key(&config.backend_api_key, "structured")?,
        )),
        BackendKind::Grounded => Arc::new(grounded::GroundedSearchApi::new(
            client,
            ensure_key(&config.backend_api_key, "grounded")?,
        )),
        BackendKind::Webhook => {
            let endpoint = config
                .backend_url
                .clone()
                .context("webhook backend needs BACKEND_URL")?;
            Arc::new(webhook::WebhookRelay::new(client, endpoint))
        }
    };

    Ok(backend)
}

fn ensure_key(key: &str, backend: &str) -> Result<String> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        bail!("{} backend needs BACKEND_API_KEY", backend);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fence_stripping_handles_the_usual_shapes() {
        assert_eq!(strip_code_fence("[1, 2]"), "[1, 2]");
        assert_eq!(strip_code_fence("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fence("```\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fence("```json[1, 2]```"), "[1, 2]");
        assert_eq!(strip_code_fence("  [1, 2]  "), "[1, 2]");
    }

    #[test]
    fn container_key_is_unwrapped_once() {
        let wrapped = json!({ "bars": [{ "name": "Dive" }] });
        assert_eq!(unwrap_container(wrapped), json!([{ "name": "Dive" }]));

        let bare = json!([{ "name": "Dive" }]);
        assert_eq!(unwrap_container(bare.clone()), bare);

        let unrelated = json!({ "venues": [] });
        assert_eq!(unwrap_container(unrelated.clone()), unrelated);
    }

    #[test]
    fn reply_text_follows_the_candidate_path() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": "hello" }] } }],
        });
        assert_eq!(reply_text(&body).unwrap(), "hello");
    }

    #[test]
    fn reply_without_text_is_malformed() {
        let body = json!({ "candidates": [{ "content": { "parts": [] } }] });
        assert!(matches!(
            reply_text(&body),
            Err(LookupError::MalformedResponse(_))
        ));
    }

    #[test]
    fn task_text_carries_the_fix() {
        let task = venue_task(Coordinates {
            latitude: 52.52,
            longitude: 13.405,
        });
        assert!(task.contains("52.52"));
        assert!(task.contains("13.405"));
    }
}
