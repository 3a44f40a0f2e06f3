#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use night_haunts_backend::backends::{FetchedVenues, VenueBackend};
use night_haunts_backend::error::LookupError;
use night_haunts_backend::location::{LocationProvider, PermissionMonitor};
use night_haunts_backend::models::coordinate::Coordinates;
use night_haunts_backend::models::source::GroundingSource;

pub fn berlin() -> Coordinates {
    Coordinates {
        latitude: 52.52,
        longitude: 13.405,
    }
}

/// Scripted location source: hands out a fixed result and counts how often
/// the platform was actually asked.
pub struct FakeLocation {
    result: Result<Coordinates, LookupError>,
    monitor: Option<PermissionMonitor>,
    calls: AtomicUsize,
}

impl FakeLocation {
    pub fn granted(fix: Coordinates) -> Self {
        Self {
            result: Ok(fix),
            monitor: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: LookupError) -> Self {
        Self {
            result: Err(error),
            monitor: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_monitor(mut self, monitor: PermissionMonitor) -> Self {
        self.monitor = Some(monitor);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationProvider for FakeLocation {
    fn provider_tag(&self) -> &'static str {
        "fake"
    }

    async fn acquire(&self, _timeout: Duration) -> Result<Coordinates, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }

    fn permission_monitor(&self) -> Option<PermissionMonitor> {
        self.monitor.clone()
    }
}

/// Scripted venue source: replays one canned payload or error.
pub struct FakeBackend {
    reply: Result<Value, LookupError>,
    sources: Vec<GroundingSource>,
}

impl FakeBackend {
    pub fn serving(raw: Value) -> Self {
        Self {
            reply: Ok(raw),
            sources: Vec::new(),
        }
    }

    pub fn failing(error: LookupError) -> Self {
        Self {
            reply: Err(error),
            sources: Vec::new(),
        }
    }

    pub fn with_sources(mut self, sources: Vec<GroundingSource>) -> Self {
        self.sources = sources;
        self
    }
}

#[async_trait]
impl VenueBackend for FakeBackend {
    fn backend_tag(&self) -> &'static str {
        "fake"
    }

    async fn fetch_venues(&self, _fix: Coordinates) -> Result<FetchedVenues, LookupError> {
        match &self.reply {
            Ok(raw) => Ok(FetchedVenues {
                raw: raw.clone(),
                sources: self.sources.clone(),
            }),
            Err(error) => Err(error.clone()),
        }
    }
}
