use serde_json::Value;

use crate::error::LookupError;
use crate::models::venue::Venue;

pub const NAME_FALLBACK: &str = "Unnamed venue";
pub const TAG_FALLBACK: &str = "unknown";
pub const ADDRESS_FALLBACK: &str = "Address unavailable";
pub const HOURS_FALLBACK: &str = "Hours not available";

/// Turns whatever a backend decoded into display-ready venues. The only hard
/// requirement is a top-level array; inside it, anything missing or mistyped
/// degrades to a sentinel instead of failing the run. Junk entries surface
/// as all-sentinel records rather than being dropped, so a misbehaving
/// backend stays visible.
pub fn normalize_venues(value: Value) -> Result<Vec<Venue>, LookupError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(LookupError::MalformedResponse(format!(
                "expected an array of venues, got {}",
                json_kind(&other)
            )))
        }
    };

    Ok(items.iter().map(normalize_venue).collect())
}

fn normalize_venue(item: &Value) -> Venue {
    Venue {
        name: coerce_string(item.get("name"), NAME_FALLBACK),
        vibe_tags: coerce_tags(item.get("vibe_tags")),
        address: coerce_string(item.get("address"), ADDRESS_FALLBACK),
        rating: display_rating(item.get("rating")),
        opening_hours: coerce_string(item.get("opening_hours"), HOURS_FALLBACK),
    }
}

fn coerce_string(value: Option<&Value>, fallback: &str) -> String {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

/// Tag lists keep their length and order. A list that is missing entirely is
/// an empty list; an entry that is not a usable string keeps its slot as a
/// sentinel so backend junk stays visible instead of vanishing.
fn coerce_tags(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .map(|entry| coerce_string(Some(entry), TAG_FALLBACK))
                .collect()
        })
        .unwrap_or_default()
}

/// Ratings render on a five-point scale with one decimal. Anything that is
/// not a finite number in range becomes "no rating" rather than a guess.
fn display_rating(value: Option<&Value>) -> Option<f64> {
    value
        .and_then(Value::as_f64)
        .filter(|rating| rating.is_finite())
        .map(|rating| rating.clamp(0.0, 5.0))
        .map(|rating| (rating * 10.0).round() / 10.0)
}

pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
