use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{FetchedVenues, VenueBackend};
use crate::error::LookupError;
use crate::models::coordinate::Coordinates;
use crate::normalize::json_kind;

/// Relay backend: coordinates go out as a POST body, venues come back from
/// whatever automation sits behind the URL. No key, no model, no citations.
pub struct WebhookRelay {
    client: Client,
    endpoint: String,
}

impl WebhookRelay {
    pub fn new(client: Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

/// Relays built from low-code tools tend to double-encode: the body is a
/// JSON string whose content is the actual JSON. Decode that one extra
/// layer, exactly once, then insist on the `bars` field the relay contract
/// promises.
fn unwrap_relay_payload(body: Value) -> Result<Value, LookupError> {
    let mut decoded = match body {
        Value::String(text) => serde_json::from_str(&text).map_err(|e| {
            LookupError::MalformedResponse(format!("relay double-encoded invalid JSON: {}", e))
        })?,
        other => other,
    };

    match decoded.get_mut("bars").map(Value::take) {
        Some(inner) => Ok(inner),
        None => Err(LookupError::MalformedResponse(format!(
            "relay body has no \"bars\" field, got {}",
            json_kind(&decoded)
        ))),
    }
}

#[async_trait]
impl VenueBackend for WebhookRelay {
    fn backend_tag(&self) -> &'static str {
        "webhook"
    }

    async fn fetch_venues(&self, fix: Coordinates) -> Result<FetchedVenues, LookupError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&fix)
            .send()
            .await
            .map_err(|e| LookupError::BackendFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::BackendFailure(format!(
                "relay endpoint answered {}",
                status
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| LookupError::MalformedResponse(e.to_string()))?;

        Ok(FetchedVenues::bare(unwrap_relay_payload(body)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_container_bodies_unwrap() {
        let body = json!({ "bars": [{ "name": "Dive" }] });
        assert_eq!(
            unwrap_relay_payload(body).unwrap(),
            json!([{ "name": "Dive" }])
        );
    }

    #[test]
    fn bodies_without_the_bars_field_are_malformed() {
        let result = unwrap_relay_payload(json!([{ "name": "Dive" }]));
        assert!(matches!(result, Err(LookupError::MalformedResponse(_))));
    }

    #[test]
    fn double_encoded_bodies_decode_once_more() {
        let body = Value::String(r#"{"bars": [{"name": "Dive"}]}"#.to_string());
        assert_eq!(
            unwrap_relay_payload(body).unwrap(),
            json!([{ "name": "Dive" }])
        );
    }

    #[test]
    fn double_encoded_garbage_is_malformed() {
        let body = Value::String("not json at all".to_string());
        assert!(matches!(
            unwrap_relay_payload(body),
            Err(LookupError::MalformedResponse(_))
        ));
    }

    #[test]
    fn request_body_is_the_fix_itself() {
        let fix = Coordinates {
            latitude: 1.3,
            longitude: 103.8,
        };
        assert_eq!(
            serde_json::to_value(fix).unwrap(),
            json!({ "latitude": 1.3, "longitude": 103.8 })
        );
    }
}
