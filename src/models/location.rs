use serde::{Deserialize, Serialize};

/// A resolved user position.
///
/// `address` is part of the wire shape but never populated client-side —
/// reverse geocoding is the backend's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl UserLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            address: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_has_no_address() {
        let loc = UserLocation::new(37.5665, 126.978);
        assert_eq!(loc.latitude, 37.5665);
        assert_eq!(loc.longitude, 126.978);
        assert!(loc.address.is_none());
    }

    #[test]
    fn address_omitted_from_serialization_when_none() {
        let loc = UserLocation::new(1.0, 2.0);
        let json = serde_json::to_string(&loc).unwrap();
        assert!(!json.contains("address"));
    }
}
