use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::{
    reply_text, strip_code_fence, unwrap_container, venue_task, FetchedVenues, VenueBackend,
};
use crate::error::LookupError;
use crate::models::coordinate::Coordinates;

const GENERATE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

/// Model backend running in structured-output mode: the response schema asks
/// for the venue array directly, so the reply text should already be JSON.
pub struct StructuredApi {
    client: Client,
    api_key: String,
}

impl StructuredApi {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

fn request_body(fix: Coordinates) -> Value {
    let task = format!("{} Answer with the JSON array only.", venue_task(fix));

    json!({
        "contents": [{ "parts": [{ "text": task }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "vibe_tags": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "address": { "type": "STRING" },
                        "rating": { "type": "NUMBER" },
                        "opening_hours": { "type": "STRING" },
                    },
                    "required": ["name", "vibe_tags", "address", "rating", "opening_hours"],
                },
            },
        },
    })
}

fn digest_structured_body(body: Value) -> Result<Value, LookupError> {
    let text = reply_text(&body)?;

    let decoded: Value = serde_json::from_str(strip_code_fence(text)).map_err(|e| {
        LookupError::MalformedResponse(format!("structured reply text is not JSON: {}", e))
    })?;

    Ok(unwrap_container(decoded))
}

#[async_trait]
impl VenueBackend for StructuredApi {
    fn backend_tag(&self) -> &'static str {
        "structured"
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
                "structured endpoint answered {}",
                status
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| LookupError::MalformedResponse(e.to_string()))?;

        Ok(FetchedVenues::bare(digest_structured_body(body)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply_with(text: &str) -> Value {
        json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }],
        })
    }

    #[test]
    fn schema_mode_is_requested() {
        let body = request_body(Coordinates {
            latitude: 1.3,
            longitude: 103.8,
        });

        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert!(body["generationConfig"]["responseSchema"].is_object());
    }

    #[test]
    fn container_reply_digests_to_the_bare_array() {
        let body = reply_with(r#"{"bars": [{"name": "Dive"}]}"#);
        assert_eq!(
            digest_structured_body(body).unwrap(),
            json!([{ "name": "Dive" }])
        );
    }

    #[test]
    fn fenced_array_reply_digests_too() {
        let body = reply_with("```json\n[{\"name\": \"Dive\"}]\n```");
        assert_eq!(
            digest_structured_body(body).unwrap(),
            json!([{ "name": "Dive" }])
        );
    }

    #[test]
    fn non_json_reply_text_is_malformed() {
        let body = reply_with("sorry, no bars tonight");
        assert!(matches!(
            digest_structured_body(body),
            Err(LookupError::MalformedResponse(_))
        ));
    }

    #[test]
    fn missing_candidates_are_malformed() {
        assert!(matches!(
            digest_structured_body(json!({})),
            Err(LookupError::MalformedResponse(_))
        ));
    }
}
