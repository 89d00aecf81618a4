use serde::{Deserialize, Serialize};

use crate::identity::UserId;
use crate::location::Location;

/// An entry of the public vendor directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorListing {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub cuisine: String,
    pub location: Location,
    #[serde(default)]
    pub rating: Option<f64>,
}

/// Parse a JSON array of vendor records.
pub fn parse_vendors(json: &str) -> Result<Vec<VendorListing>, serde_json::Error> {
    serde_json::from_str(json)
}
