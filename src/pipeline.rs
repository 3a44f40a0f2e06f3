use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::backends::VenueBackend;
use crate::error::LookupError;
use crate::location::{LocationProvider, PermissionState};
use crate::models::source::GroundingSource;
use crate::models::venue::Venue;
use crate::normalize::normalize_venues;

/// Everything one successful run hands to the presentation layer.
#[derive(Debug, PartialEq)]
pub struct LookupOutcome {
    pub venues: Vec<Venue>,
    pub sources: Vec<GroundingSource>,
}

/// The whole journey from "where am I" to display-ready venues, wired once
/// at startup from whichever provider and backend the config picked.
pub struct VenueLookup {
    location: Arc<dyn LocationProvider>,
    backend: Arc<dyn VenueBackend>,
    location_timeout: Duration,
}

impl VenueLookup {
    pub fn new(
        location: Arc<dyn LocationProvider>,
        backend: Arc<dyn VenueBackend>,
        location_timeout: Duration,
    ) -> Self {
        Self {
            location,
            backend,
            location_timeout,
        }
    }

    /// A known denial short-circuits before the platform is touched, so a
    /// blocked run never triggers a prompt or spends a fix attempt.
    pub async fn run(&self) -> Result<LookupOutcome, LookupError> {
        if let Some(monitor) = self.location.permission_monitor() {
            if !monitor.current().allows_lookup() {
                return Err(LookupError::PermissionDenied);
            }
        }

        let fix = self.location.acquire(self.location_timeout).await?;
        info!(
            "located via {} near {:.3}, {:.3}",
            self.location.provider_tag(),
            fix.latitude,
            fix.longitude
        );

        let fetched = self.backend.fetch_venues(fix).await?;
        let venues = normalize_venues(fetched.raw)?;
        info!(
            "{} backend delivered {} venues and {} sources",
            self.backend.backend_tag(),
            venues.len(),
            fetched.sources.len()
        );

        Ok(LookupOutcome {
            venues,
            sources: fetched.sources,
        })
    }

    pub fn permission_state(&self) -> Option<PermissionState> {
        self.location
            .permission_monitor()
            .map(|monitor| monitor.current())
    }
}
