use serde::{Deserialize, Serialize};

/// Citation attached by the search-grounded backend as provenance for its
/// answer. Best-effort data for the frontend's source chips.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct GroundingSource {
    pub uri: String,
    pub title: String,
}
