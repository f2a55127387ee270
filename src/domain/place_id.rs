//! External geodata identifier.
//!
//! A [`PlaceId`] is the id the map provider assigns to a point of
//! interest, stored in the canonical `<type>/<number>` form
//! (`node/55`, `way/1203`). It is the join key between locally stored
//! events and live Overpass lookups.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExplorerError;

/// OpenStreetMap element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// A single point.
    Node,
    /// A polyline or polygon.
    Way,
    /// A grouping of other elements.
    Relation,
}

impl ElementType {
    /// Overpass QL keyword for this element type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

impl FromStr for ElementType {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(Self::Node),
            "way" => Ok(Self::Way),
            "relation" => Ok(Self::Relation),
            other => Err(ExplorerError::InvalidRequest(format!(
                "unknown element type: {other}"
            ))),
        }
    }
}

/// Identifier of an externally sourced place.
///
/// Serialized as its canonical string; DTOs document it with
/// `#[schema(value_type = String)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlaceId {
    element_type: ElementType,
    osm_id: i64,
}

impl PlaceId {
    /// Creates a place id from its parts.
    #[must_use]
    pub const fn new(element_type: ElementType, osm_id: i64) -> Self {
        Self {
            element_type,
            osm_id,
        }
    }

    /// Parses `node/55`, `way/12` or a bare `55` (read as a node).
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::InvalidRequest`] on any other shape.
    pub fn parse(raw: &str) -> Result<Self, ExplorerError> {
        let raw = raw.trim().trim_matches('/');
        let (element_type, number) = match raw.split_once('/') {
            Some((kind, number)) => (kind.parse()?, number),
            None => (ElementType::Node, raw),
        };
        let osm_id = number
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| ExplorerError::InvalidRequest(format!("invalid place_id: {raw}")))?;
        Ok(Self::new(element_type, osm_id))
    }

    /// Element type of the place.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Numeric OSM id within its element type.
    #[must_use]
    pub const fn osm_id(&self) -> i64 {
        self.osm_id
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.element_type.as_str(), self.osm_id)
    }
}

impl FromStr for PlaceId {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PlaceId {
    type Error = ExplorerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PlaceId> for String {
    fn from(id: PlaceId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_form() {
        let Ok(id) = PlaceId::parse("node/55") else {
            panic!("valid id");
        };
        assert_eq!(id.element_type(), ElementType::Node);
        assert_eq!(id.osm_id(), 55);
        assert_eq!(id.to_string(), "node/55");
    }

    #[test]
    fn bare_number_is_a_node() {
        let Ok(id) = PlaceId::parse("1234") else {
            panic!("valid id");
        };
        assert_eq!(id, PlaceId::new(ElementType::Node, 1234));
    }

    #[test]
    fn way_and_relation_are_accepted() {
        assert!(matches!(PlaceId::parse("way/7"), Ok(id) if id.element_type() == ElementType::Way));
        assert!(
            matches!(PlaceId::parse("relation/9"), Ok(id) if id.element_type() == ElementType::Relation)
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(PlaceId::parse("area/5").is_err());
        assert!(PlaceId::parse("node/abc").is_err());
        assert!(PlaceId::parse("node/-3").is_err());
        assert!(PlaceId::parse("").is_err());
    }

    #[test]
    fn serializes_as_string() {
        let id = PlaceId::new(ElementType::Way, 12);
        let Ok(json) = serde_json::to_string(&id) else {
            panic!("serialization failed");
        };
        assert_eq!(json, "\"way/12\"");
    }
}
