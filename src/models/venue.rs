use serde::{Deserialize, Serialize};
use url::form_urlencoded;

pub const RATING_UNAVAILABLE: &str = "not available";

const MAPS_SEARCH_BASE: &str = "https://www.google.com/maps/search/?api=1&query=";

/// One recommended bar, already normalized: every field is safe to drop
/// straight into a card, nothing nested ever reaches a display position.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Venue {
    pub name: String,
    pub vibe_tags: Vec<String>,
    pub address: String,
    pub rating: Option<f64>,
    pub opening_hours: String,
}

impl Venue {
    /// One-decimal rating text. A backend that sent no usable number gets
    /// the fixed placeholder; an explicit 0 is a real rating and reads "0.0".
    pub fn rating_label(&self) -> String {
        match self.rating {
            Some(rating) => format!("{:.1}", rating),
            None => RATING_UNAVAILABLE.to_string(),
        }
    }

    /// Directions link for the frontend, built from the URL-encoded
    /// "name, address" pair.
    pub fn maps_url(&self) -> String {
        let query = format!("{}, {}", self.name, self.address);
        let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        format!("{MAPS_SEARCH_BASE}{encoded}")
    }
}
