//! Mapbox geocoding response types.

use groupie_core::{GeoLocation, GeocodeError};
use serde::Deserialize;

/// Raw forward-geocoding response from Mapbox.
#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// A single candidate place. `center` is `[longitude, latitude]`.
#[derive(Debug, Deserialize)]
pub struct Feature {
    pub center: [f64; 2],
}

impl FeatureCollection {
    /// Take the best (first) candidate for `address`.
    pub fn into_location(self, address: &str) -> Result<GeoLocation, GeocodeError> {
        let feature = self
            .features
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NoMatch(address.to_string()))?;

        let [lon, lat] = feature.center;
        Ok(GeoLocation { address: address.to_string(), lat, lon })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_feature_wins() {
        let json = r#"{
            "type": "FeatureCollection",
            "query": ["london", "uk"],
            "features": [
                {"id": "place.1", "place_name": "London, Greater London, United Kingdom", "center": [-0.1275, 51.50722]},
                {"id": "place.2", "place_name": "London, Ontario, Canada", "center": [-81.2497, 42.9837]}
            ]
        }"#;

        let collection: FeatureCollection = serde_json::from_str(json).unwrap();
        let location = collection.into_location("london-uk").unwrap();
        assert_eq!(location.address, "london-uk");
        assert_eq!(location.lon, -0.1275);
        assert_eq!(location.lat, 51.50722);
    }

    #[test]
    fn test_empty_features_is_no_match() {
        let collection: FeatureCollection = serde_json::from_str(r#"{"features": []}"#).unwrap();
        assert_eq!(collection.into_location("atlantis").unwrap_err(), GeocodeError::NoMatch("atlantis".into()));
    }

    #[test]
    fn test_missing_features_is_no_match() {
        let collection: FeatureCollection = serde_json::from_str(r#"{"message": "Not Found"}"#).unwrap();
        assert!(matches!(collection.into_location("x"), Err(GeocodeError::NoMatch(_))));
    }

    #[test]
    fn test_malformed_center_rejected() {
        let result = serde_json::from_str::<FeatureCollection>(r#"{"features": [{"center": [1.0]}]}"#);
        assert!(result.is_err());
    }
}
