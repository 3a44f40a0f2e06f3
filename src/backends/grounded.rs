use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde_json::{json, Value};

use super::{reply_text, unwrap_container, venue_task, FetchedVenues, VenueBackend};
use crate::error::LookupError;
use crate::models::coordinate::Coordinates;
use crate::models::source::GroundingSource;

const GENERATE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

/// Model backend with web search enabled. Replies are prose with an embedded
/// JSON block, plus grounding metadata naming the pages the answer leaned on.
pub struct GroundedSearchApi {
    client: Client,
    api_key: String,
}

impl GroundedSearchApi {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

fn request_body(fix: Coordinates) -> Value {
    let task = format!(
        "{} Reply with exactly one fenced ```json code block containing an object with a \
         single \"bars\" key holding that array.",
        venue_task(fix)
    );

    json!({
        "contents": [{ "parts": [{ "text": task }] }],
        "tools": [{ "googleSearch": {} }],
    })
}

fn fenced_json_block(text: &str) -> Option<&str> {
    let fence = Regex::new(r"(?s)```json\s*(.*?)```").unwrap();
    fence
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|block| block.as_str())
}

/// The venue array must come out of the reply text before citations are even
/// looked at: a reply without a fenced block fails the whole digest, sources
/// or not.
fn digest_grounded_reply(body: Value) -> Result<FetchedVenues, LookupError> {
    let text = reply_text(&body)?;
    let Some(block) = fenced_json_block(text) else {
        return Err(LookupError::MalformedResponse(
            "grounded reply has no fenced JSON block".to_string(),
        ));
    };

    let decoded: Value = serde_json::from_str(block).map_err(|e| {
        LookupError::MalformedResponse(format!("fenced block is not valid JSON: {}", e))
    })?;

    Ok(FetchedVenues {
        raw: unwrap_container(decoded),
        sources: collect_sources(&body),
    })
}

fn collect_sources(body: &Value) -> Vec<GroundingSource> {
    body.get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.get("groundingMetadata"))
        .and_then(|metadata| metadata.get("groundingChunks"))
        .and_then(Value::as_array)
        .map(|chunks| chunks.iter().filter_map(source_from_chunk).collect())
        .unwrap_or_default()
}

fn source_from_chunk(chunk: &Value) -> Option<GroundingSource> {
    let web = chunk.get("web")?;
    let uri = web.get("uri").and_then(Value::as_str)?;
    let title = web
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or(uri);

    Some(GroundingSource {
        uri: uri.to_string(),
        title: title.to_string(),
    })
}

#[async_trait]
impl VenueBackend for GroundedSearchApi {
    fn backend_tag(&self) -> &'static str {
        "grounded"
    }

    async fn fetch_venues(&self, fix: Coordinates) -> Result<FetchedVenues, LookupError> {
        let response = self
            .client
            .post(GENERATE_URL)
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body(fix))
            .send()
            .await
            .map_err(|e| LookupError::BackendFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::BackendFailure(format!(
                "grounded endpoint answered {}",
                status
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| LookupError::MalformedResponse(e.to_string()))?;

        digest_grounded_reply(body)
    }
}
