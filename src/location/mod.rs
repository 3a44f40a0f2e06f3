pub mod ip_api;
pub mod pinned;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::watch;

use crate::config::{Config, LocationMode};
use crate::error::LookupError;
use crate::models::coordinate::Coordinates;

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Prompt,
    Denied,
}

impl PermissionState {
    /// Only an explicit denial blocks a lookup; a pending prompt is allowed
    /// to proceed and resolve itself.
    pub fn allows_lookup(self) -> bool {
        !matches!(self, PermissionState::Denied)
    }
}

/// Read side of a permission mirror. Holders always see the latest state the
/// provider pushed, without polling the platform again.
#[derive(Clone, Debug)]
pub struct PermissionMonitor {
    receiver: watch::Receiver<PermissionState>,
}

impl PermissionMonitor {
    pub fn current(&self) -> PermissionState {
        *self.receiver.borrow()
    }
}

/// Write side, kept by the provider that owns the underlying permission.
#[derive(Debug)]
pub struct PermissionSwitch {
    sender: watch::Sender<PermissionState>,
}

impl PermissionSwitch {
    pub fn set(&self, state: PermissionState) {
        self.sender.send_replace(state);
    }
}

pub fn permission_mirror(initial: PermissionState) -> (PermissionSwitch, PermissionMonitor) {
    let (sender, receiver) = watch::channel(initial);
    (PermissionSwitch { sender }, PermissionMonitor { receiver })
}

/// Where the "near you" in a lookup comes from. Implementations trade
/// accuracy for availability; the pipeline only cares about the fix and the
/// failure taxonomy.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    fn provider_tag(&self) -> &'static str;

    async fn acquire(&self, timeout: Duration) -> Result<Coordinates, LookupError>;

    /// Providers that track consent expose their mirror here. Ones that
    /// cannot know (network geolocation) return None.
    fn permission_monitor(&self) -> Option<PermissionMonitor> {
        None
    }
}

/// Stand-in for deployments with no usable location source at all.
pub struct UnsupportedPlatform;

#[async_trait]
impl LocationProvider for UnsupportedPlatform {
    fn provider_tag(&self) -> &'static str {
        "unsupported"
    }

    async fn acquire(&self, _timeout: Duration) -> Result<Coordinates, LookupError> {
        Err(LookupError::Unsupported)
    }
}

pub fn from_config(config: &Config, client: reqwest::Client) -> Result<Arc<dyn LocationProvider>> {
    let provider: Arc<dyn LocationProvider> = match config.location_mode {
        LocationMode::Ip => Arc::new(ip_api::IpLookupProvider::new(
            client,
            config.location_url.clone(),
        )),
        LocationMode::Pinned => {
            let (Some(latitude), Some(longitude)) =
                (config.pinned_latitude, config.pinned_longitude)
            else {
                bail!("pinned location mode needs PINNED_LATITUDE and PINNED_LONGITUDE");
            };
            if !(-90.0..=90.0).contains(&latitude) {
                bail!("pinned latitude {} is out of range", latitude);
            }
            if !(-180.0..=180.0).contains(&longitude) {
                bail!("pinned longitude {} is out of range", longitude);
            }
            Arc::new(pinned::PinnedLocation::with_consent(Coordinates {
                latitude,
                longitude,
            }))
        }
        LocationMode::None => Arc::new(UnsupportedPlatform),
    };

    Ok(provider)
}
