use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::LocationProvider;
use crate::error::LookupError;
use crate::models::coordinate::Coordinates;

/// City-level fix derived from the caller's IP. Coarse, but available
/// anywhere an outbound request works, and it needs no consent flow.
pub struct IpLookupProvider {
    client: Client,
    endpoint: String,
}

#[derive(Deserialize, Debug)]
struct IpFix {
    latitude: f64,
    longitude: f64,
}

impl IpLookupProvider {
    pub fn new(client: Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl LocationProvider for IpLookupProvider {
    fn provider_tag(&self) -> &'static str {
        "ip_api"
    }

    async fn acquire(&self, timeout: Duration) -> Result<Coordinates, LookupError> {
        let response = self
            .client
            .get(&self.endpoint)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LookupError::Timeout(timeout.as_millis() as u64)
                } else {
                    LookupError::PositionUnavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::PositionUnavailable(format!(
                "geolocation endpoint answered {}",
                status
            )));
        }

        let fix: IpFix = response
            .json()
            .await
            .map_err(|e| LookupError::PositionUnavailable(e.to_string()))?;

        if !(-90.0..=90.0).contains(&fix.latitude) || !(-180.0..=180.0).contains(&fix.longitude) {
            return Err(LookupError::PositionUnavailable(format!(
                "fix out of range: {}, {}",
                fix.latitude, fix.longitude
            )));
        }

        Ok(Coordinates {
            latitude: fix.latitude,
            longitude: fix.longitude,
        })
    }
}
