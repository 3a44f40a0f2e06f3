use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Every way a lookup run can fail. Each variant is produced at the failure
/// source (location capability, transport call, decode step), so classifying
/// is a plain match rather than message sniffing.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum LookupError {
    #[error("geolocation is not available on this platform")]
    Unsupported,

    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    PositionUnavailable(String),

    #[error("no location fix within {0}ms")]
    Timeout(u64),

    #[error("backend request failed: {0}")]
    BackendFailure(String),

    #[error("malformed backend response: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    Other(String),
}

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    PermissionDenied,
    PositionUnavailable,
    LocationTimeout,
    GeolocationUnsupported,
    NetworkOrBackendFailure,
    MalformedResponse,
    Unknown,
}

/// What a failed run looks like to the presentation layer: one category, one
/// fixed message. The diagnostic detail is for the logs only.
#[derive(Clone, Serialize, Debug)]
pub struct ClassifiedError {
    pub category: ErrorCategory,
    pub message: &'static str,
    #[serde(skip)]
    pub detail: String,
}

pub fn classify(error: &LookupError) -> ClassifiedError {
    let category = match error {
        LookupError::Unsupported => ErrorCategory::GeolocationUnsupported,
        LookupError::PermissionDenied => ErrorCategory::PermissionDenied,
        LookupError::PositionUnavailable(_) => ErrorCategory::PositionUnavailable,
        LookupError::Timeout(_) => ErrorCategory::LocationTimeout,
        LookupError::BackendFailure(_) => ErrorCategory::NetworkOrBackendFailure,
        LookupError::MalformedResponse(_) => ErrorCategory::MalformedResponse,
        LookupError::Other(_) => ErrorCategory::Unknown,
    };

    ClassifiedError {
        category,
        message: user_message(category),
        detail: error.to_string(),
    }
}

fn user_message(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::PermissionDenied => {
            "Location access was denied. Allow it to find bars near you."
        }
        ErrorCategory::PositionUnavailable => {
            "We couldn't pin down where you are. Try again in a moment."
        }
        ErrorCategory::LocationTimeout => "Finding your location took too long. Try again.",
        ErrorCategory::GeolocationUnsupported => "Location lookup isn't supported here.",
        ErrorCategory::NetworkOrBackendFailure => {
            "The venue service didn't answer. Try again shortly."
        }
        ErrorCategory::MalformedResponse => "The venue service sent something we couldn't read.",
        ErrorCategory::Unknown => "Something unexpected went wrong.",
    }
}

impl IntoResponse for ClassifiedError {
    fn into_response(self) -> Response {
        let status = match self.category {
            ErrorCategory::PermissionDenied => StatusCode::FORBIDDEN,
            ErrorCategory::PositionUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCategory::LocationTimeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorCategory::GeolocationUnsupported => StatusCode::NOT_IMPLEMENTED,
            ErrorCategory::NetworkOrBackendFailure => StatusCode::BAD_GATEWAY,
            ErrorCategory::MalformedResponse => StatusCode::BAD_GATEWAY,
            ErrorCategory::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, json!(&self).to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_lands_in_its_category() {
        let cases = [
            (LookupError::Unsupported, ErrorCategory::GeolocationUnsupported),
            (LookupError::PermissionDenied, ErrorCategory::PermissionDenied),
            (
                LookupError::PositionUnavailable("gps cold".to_string()),
                ErrorCategory::PositionUnavailable,
            ),
            (LookupError::Timeout(10_000), ErrorCategory::LocationTimeout),
            (
                LookupError::BackendFailure("status 502".to_string()),
                ErrorCategory::NetworkOrBackendFailure,
            ),
            (
                LookupError::MalformedResponse("not an array".to_string()),
                ErrorCategory::MalformedResponse,
            ),
            (LookupError::Other("???".to_string()), ErrorCategory::Unknown),
        ];

        for (error, expected) in cases {
            assert_eq!(classify(&error).category, expected);
        }
    }

    #[test]
    fn each_category_has_its_own_message() {
        let categories = [
            ErrorCategory::PermissionDenied,
            ErrorCategory::PositionUnavailable,
            ErrorCategory::LocationTimeout,
            ErrorCategory::GeolocationUnsupported,
            ErrorCategory::NetworkOrBackendFailure,
            ErrorCategory::MalformedResponse,
            ErrorCategory::Unknown,
        ];

        let mut messages: Vec<&str> = categories.iter().map(|c| user_message(*c)).collect();
        messages.sort();
        messages.dedup();
        assert_eq!(messages.len(), categories.len());
    }

    #[test]
    fn detail_keeps_the_original_diagnostics() {
        let error = LookupError::Other("left field".to_string());
        assert_eq!(classify(&error).detail, "left field");
    }

    #[test]
    fn detail_is_not_serialized_toward_the_frontend() {
        let classified = classify(&LookupError::BackendFailure("token leaked?".to_string()));
        let body = json!(&classified).to_string();
        assert!(!body.contains("token leaked?"));
        assert!(body.contains("network_or_backend_failure"));
    }
}
