use std::time::Duration;

use async_trait::async_trait;

use super::{
    permission_mirror, LocationProvider, PermissionMonitor, PermissionState, PermissionSwitch,
};
use crate::error::LookupError;
use crate::models::coordinate::Coordinates;

/// Fixed coordinates for kiosk-style deployments where the venue terminal
/// itself is the "user". Consent is still tracked so the rest of the stack
/// behaves exactly as it would with a live platform.
pub struct PinnedLocation {
    fix: Coordinates,
    switch: PermissionSwitch,
    monitor: PermissionMonitor,
}

impl PinnedLocation {
    pub fn new(fix: Coordinates, initial: PermissionState) -> Self {
        let (switch, monitor) = permission_mirror(initial);
        Self {
            fix,
            switch,
            monitor,
        }
    }

    pub fn with_consent(fix: Coordinates) -> Self {
        Self::new(fix, PermissionState::Granted)
    }

    pub fn set_permission(&self, state: PermissionState) {
        self.switch.set(state);
    }
}

#[async_trait]
impl LocationProvider for PinnedLocation {
    fn provider_tag(&self) -> &'static str {
        "pinned"
    }

    async fn acquire(&self, _timeout: Duration) -> Result<Coordinates, LookupError> {
        match self.monitor.current() {
            PermissionState::Denied => Err(LookupError::PermissionDenied),
            PermissionState::Prompt => {
                self.switch.set(PermissionState::Granted);
                Ok(self.fix)
            }
            PermissionState::Granted => Ok(self.fix),
        }
    }

    fn permission_monitor(&self) -> Option<PermissionMonitor> {
        Some(self.monitor.clone())
    }
}
