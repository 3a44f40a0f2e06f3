use serde::{Deserialize, Serialize};

/// One fresh fix from the location provider, scoped to a single lookup run.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}
