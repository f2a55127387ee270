//! Overpass QL query builders.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::models::BoundingBox;
use crate::domain::{ElementType, PlaceId};

/// Amenity categories treated as places worth meeting at.
pub const AMENITY_PATTERN: &str = "bar|biergarten|cafe|fast_food|food_court|ice_cream|pub|restaurant";

/// Nodes with a matching amenity within `radius` meters of a point.
#[must_use]
pub fn around(latitude: f64, longitude: f64, radius_meters: u32) -> String {
    format!(
        "[out:json];(node[amenity~\"{AMENITY_PATTERN}\"](around:{radius_meters},{latitude},{longitude}););out;"
    )
}

/// Elements with the given ids, grouped by element type.
#[must_use]
pub fn by_ids(ids: &[PlaceId]) -> String {
    let mut grouped: BTreeMap<ElementType, Vec<String>> = BTreeMap::new();
    for id in ids {
        grouped
            .entry(id.element_type())
            .or_default()
            .push(id.osm_id().to_string());
    }
    let mut query = String::from("[out:json];(");
    for (element_type, numbers) in &grouped {
        let _ = write!(query, "{}(id:{});", element_type.as_str(), numbers.join(","));
    }
    query.push_str(");out;");
    query
}

/// Amenity nodes whose name matches `name` (case-insensitive) inside
/// `bbox`, at most `limit` of them.
#[must_use]
pub fn named_in_bbox(name: &str, bbox: &BoundingBox, limit: u32) -> String {
    format!(
        "[out:json];node[amenity~\"{AMENITY_PATTERN}\"][\"name\"~\"{}\",i]({},{},{},{});out {limit};",
        escape(name),
        bbox.south,
        bbox.west,
        bbox.north,
        bbox.east
    )
}

/// Escapes a value for use inside a double-quoted Overpass string.
///
/// Regex metacharacters are escaped too, so the name matches literally.
#[must_use]
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\\\\\"),
            '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '^' | '$' => {
                out.push_str("\\\\");
                out.push(c);
            }
            '\n' | '\r' => out.push(' '),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn around_query_embeds_radius_and_point() {
        let q = around(36.88, 30.7, 200);
        assert_eq!(
            q,
            "[out:json];(node[amenity~\"bar|biergarten|cafe|fast_food|food_court|ice_cream|pub|restaurant\"](around:200,36.88,30.7););out;"
        );
    }

    #[test]
    fn id_query_groups_by_type() {
        let ids = [
            PlaceId::new(ElementType::Node, 1),
            PlaceId::new(ElementType::Way, 3),
            PlaceId::new(ElementType::Node, 2),
        ];
        assert_eq!(by_ids(&ids), "[out:json];(node(id:1,2);way(id:3););out;");
    }

    #[test]
    fn named_query_uses_south_west_north_east() {
        let bbox = BoundingBox {
            south: 1.0,
            west: 2.0,
            north: 3.0,
            east: 4.0,
        };
        let q = named_in_bbox("Kahve", &bbox, 10);
        assert!(q.contains("[\"name\"~\"Kahve\",i](1,2,3,4);out 10;"));
    }

    #[test]
    fn escape_neutralizes_quotes_and_regex() {
        assert_eq!(escape("Joe's \"Bar\""), "Joe's \\\"Bar\\\"");
        assert_eq!(escape("a.b"), "a\\\\.b");
    }
}
