//! Wire types for Overpass and Nominatim responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{ElementType, PlaceId};
use crate::error::ExplorerError;

/// Top-level Overpass `[out:json]` document.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassResponse {
    /// Matched elements.
    #[serde(default)]
    pub elements: Vec<OsmElement>,
}

/// One OSM element as returned by Overpass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OsmElement {
    /// Element type.
    #[serde(rename = "type")]
    pub element_type: ElementType,
    /// Numeric id within the type.
    pub id: i64,
    /// Latitude (nodes only).
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude (nodes only).
    #[serde(default)]
    pub lon: Option<f64>,
    /// Free-form OSM tags (`name`, `amenity`, `opening_hours`, …).
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl OsmElement {
    /// The element's external id in `<type>/<id>` form.
    #[must_use]
    pub const fn place_id(&self) -> PlaceId {
        PlaceId::new(self.element_type, self.id)
    }

    /// The `name` tag, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.tags.get("name").map(String::as_str)
    }
}

/// One Nominatim search hit. Only the fields we use are decoded.
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    /// `[south, north, west, east]` as decimal strings.
    pub boundingbox: Vec<String>,
}

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum latitude.
    pub south: f64,
    /// Minimum longitude.
    pub west: f64,
    /// Maximum latitude.
    pub north: f64,
    /// Maximum longitude.
    pub east: f64,
}

impl TryFrom<&NominatimPlace> for BoundingBox {
    type Error = ExplorerError;

    fn try_from(place: &NominatimPlace) -> Result<Self, Self::Error> {
        let parsed: Vec<f64> = place
            .boundingbox
            .iter()
            .filter_map(|v| v.parse().ok())
            .collect();
        match parsed.as_slice() {
            [south, north, west, east] => Ok(Self {
                south: *south,
                west: *west,
                north: *north,
                east: *east,
            }),
            _ => Err(ExplorerError::UpstreamUnavailable(format!(
                "malformed bounding box: {:?}",
                place.boundingbox
            ))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn decodes_overpass_nodes() {
        let body = r#"{
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 55, "lat": 36.88, "lon": 30.70,
                 "tags": {"amenity": "cafe", "name": "Kahve"}},
                {"type": "way", "id": 9}
            ]
        }"#;
        let Ok(resp) = serde_json::from_str::<OverpassResponse>(body) else {
            panic!("decode failed");
        };
        assert_eq!(resp.elements.len(), 2);
        let Some(first) = resp.elements.first() else {
            panic!("missing element");
        };
        assert_eq!(first.place_id().to_string(), "node/55");
        assert_eq!(first.name(), Some("Kahve"));
        let Some(second) = resp.elements.get(1) else {
            panic!("missing element");
        };
        assert_eq!(second.place_id().to_string(), "way/9");
        assert!(second.tags.is_empty());
    }

    #[test]
    fn bounding_box_reorders_nominatim_fields() {
        let hit = NominatimPlace {
            boundingbox: vec![
                "36.80".to_string(),
                "36.95".to_string(),
                "30.60".to_string(),
                "30.80".to_string(),
            ],
        };
        let Ok(bbox) = BoundingBox::try_from(&hit) else {
            panic!("valid bbox");
        };
        assert!((bbox.south - 36.80).abs() < f64::EPSILON);
        assert!((bbox.north - 36.95).abs() < f64::EPSILON);
        assert!((bbox.west - 30.60).abs() < f64::EPSILON);
        assert!((bbox.east - 30.80).abs() < f64::EPSILON);
    }

    #[test]
    fn nominatim_hit_decodes_with_unused_fields() {
        let raw = r#"[{"place_id": 282, "osm_type": "relation", "osm_id": 6235,
            "display_name": "Antalya, Türkiye", "class": "boundary",
            "boundingbox": ["36.80", "36.95", "30.60", "30.80"]}]"#;
        let Ok(hits) = serde_json::from_str::<Vec<NominatimPlace>>(raw) else {
            panic!("should decode");
        };
        let Some(hit) = hits.first() else {
            panic!("missing hit");
        };
        assert_eq!(hit.boundingbox.len(), 4);
        assert!(BoundingBox::try_from(hit).is_ok());
    }

    #[test]
    fn short_bounding_box_is_rejected() {
        let hit = NominatimPlace {
            boundingbox: vec!["1".to_string()],
        };
        assert!(BoundingBox::try_from(&hit).is_err());
    }
}
