use clap::{Parser, ValueEnum};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Structured,
    Grounded,
    Webhook,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocationMode {
    Ip,
    Pinned,
    None,
}

#[derive(Parser, Clone)]
pub struct Config {
    /// Which venue source answers lookups.
    #[clap(env, long, value_enum, default_value = "structured")]
    pub venue_backend: BackendKind,

    /// Key for the model-based backends. The webhook backend ignores it.
    #[clap(env, long, default_value = "")]
    pub backend_api_key: String,

    /// Relay URL, required when the webhook backend is selected.
    #[clap(env, long)]
    pub backend_url: Option<String>,

    /// How this deployment learns where the caller is.
    #[clap(env, long, value_enum, default_value = "ip")]
    pub location_mode: LocationMode,

    /// IP geolocation endpoint used in the `ip` mode.
    #[clap(env, long, default_value = "https://ipapi.co/json/")]
    pub location_url: String,

    /// Longest a location fix may take before the run fails as timed out.
    #[clap(env, long, default_value = "10000")]
    pub location_timeout_ms: u64,

    #[clap(env, long)]
    pub pinned_latitude: Option<f64>,

    #[clap(env, long)]
    pub pinned_longitude: Option<f64>,

    #[clap(env, long, default_value = "3000")]
    pub port: u16,

    /// Comma-separated origins allowed to call this service.
    #[clap(env, long, default_value = "http://localhost:5173")]
    pub origin_urls: String,
}
