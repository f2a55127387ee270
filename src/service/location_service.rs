//! Geodata lookups merged with locally stored events.
//!
//! The gateway supplies places; the store supplies events keyed by the
//! same external id. [`attach_events`] is the join: every place gets the
//! list (possibly empty) of its events that have not ended yet.

use std::collections::{HashMap, HashSet};

use chrono::Utc;

use crate::domain::{PlaceId, TelegramId};
use crate::error::ExplorerError;
use crate::geodata::{GeodataGateway, OsmElement};
use crate::persistence::PostgresPersistence;
use crate::persistence::models::ActiveEventRow;

/// A geodata place annotated with local state.
#[derive(Debug, Clone)]
pub struct PlaceWithEvents {
    /// Place as returned by the provider.
    pub place: OsmElement,
    /// The requesting user has favorited this place.
    pub is_favorite: bool,
    /// Events at this place that end after the read time.
    pub events: Vec<ActiveEventRow>,
}

/// Left-joins `places` with `events` on the external id.
///
/// Events for places not in `places` are dropped; event order within a
/// place follows the input order.
#[must_use]
pub fn attach_events(
    places: Vec<OsmElement>,
    events: Vec<ActiveEventRow>,
    favorites: &HashSet<String>,
) -> Vec<PlaceWithEvents> {
    let mut by_place: HashMap<String, Vec<ActiveEventRow>> = HashMap::new();
    for event in events {
        by_place.entry(event.place_id.clone()).or_default().push(event);
    }
    places
        .into_iter()
        .map(|place| {
            let key = place.place_id().to_string();
            PlaceWithEvents {
                is_favorite: favorites.contains(&key),
                events: by_place.remove(&key).unwrap_or_default(),
                place,
            }
        })
        .collect()
}

/// Orchestrates gateway calls and the merge step.
#[derive(Debug, Clone)]
pub struct LocationService {
    store: PostgresPersistence,
    gateway: GeodataGateway,
}

impl LocationService {
    /// Creates a new `LocationService`.
    #[must_use]
    pub fn new(store: PostgresPersistence, gateway: GeodataGateway) -> Self {
        Self { store, gateway }
    }

    /// Places around a point, radius defaulting to the configured one.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::InvalidRequest`] for out-of-range
    /// coordinates and [`ExplorerError::UpstreamUnavailable`] when the
    /// gateway fails.
    pub async fn around(
        &self,
        viewer: Option<&TelegramId>,
        latitude: f64,
        longitude: f64,
        radius_meters: Option<u32>,
    ) -> Result<Vec<PlaceWithEvents>, ExplorerError> {
        validate_coordinates(latitude, longitude)?;
        let radius = radius_meters.unwrap_or(self.gateway.config().search_radius_meters);
        let places = self
            .gateway
            .places_around(latitude, longitude, radius)
            .await?;
        self.merge(viewer, places).await
    }

    /// Places named like `place_name` inside `region_name`.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::NotFound`] for an unknown region and
    /// [`ExplorerError::UpstreamUnavailable`] when the gateway fails.
    pub async fn search(
        &self,
        viewer: Option<&TelegramId>,
        region_name: &str,
        place_name: &str,
    ) -> Result<Vec<PlaceWithEvents>, ExplorerError> {
        let places = self
            .gateway
            .search_in_region(region_name, place_name)
            .await?;
        self.merge(viewer, places).await
    }

    /// One place by external id.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::NotFound`] if the provider does not know
    /// the id and [`ExplorerError::UpstreamUnavailable`] when it fails.
    pub async fn place(
        &self,
        viewer: Option<&TelegramId>,
        place_id: PlaceId,
    ) -> Result<PlaceWithEvents, ExplorerError> {
        let place = self
            .gateway
            .place_by_id(place_id)
            .await?
            .ok_or_else(|| ExplorerError::not_found("place", place_id))?;
        let merged = self.merge(viewer, vec![place]).await?;
        merged
            .into_iter()
            .next()
            .ok_or_else(|| ExplorerError::Internal("merge dropped a place".to_string()))
    }

    async fn merge(
        &self,
        viewer: Option<&TelegramId>,
        places: Vec<OsmElement>,
    ) -> Result<Vec<PlaceWithEvents>, ExplorerError> {
        if places.is_empty() {
            return Ok(Vec::new());
        }
        let now = Utc::now().naive_utc();
        let ids: Vec<String> = places.iter().map(|p| p.place_id().to_string()).collect();
        let events = self.store.active_events_at(&ids, now).await?;
        let favorites = match viewer {
            Some(telegram_id) => self
                .store
                .favorite_place_ids(telegram_id)
                .await?
                .into_iter()
                .collect(),
            None => HashSet::new(),
        };
        tracing::debug!(places = places.len(), events = events.len(), "merged geodata with events");
        Ok(attach_events(places, events, &favorites))
    }
}

/// Rejects coordinates outside WGS84 ranges.
///
/// # Errors
///
/// Returns [`ExplorerError::InvalidRequest`] naming the bad coordinate.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), ExplorerError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ExplorerError::InvalidRequest(format!(
            "latitude out of range: {latitude}"
        )));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(ExplorerError::InvalidRequest(format!(
            "longitude out of range: {longitude}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::ElementType;
    use chrono::NaiveDateTime;
    use std::collections::BTreeMap;

    fn place(id: i64) -> OsmElement {
        OsmElement {
            element_type: ElementType::Node,
            id,
            lat: Some(36.88),
            lon: Some(30.70),
            tags: BTreeMap::new(),
        }
    }

    fn event(id: i32, place_id: &str) -> ActiveEventRow {
        let Ok(organizer) = TelegramId::parse("100") else {
            panic!("valid id");
        };
        let Ok(start) = "2030-01-01T10:00:00".parse::<NaiveDateTime>() else {
            panic!("valid ts");
        };
        ActiveEventRow {
            id,
            name: format!("event {id}"),
            description: String::new(),
            start_datetime: start,
            end_datetime: start + chrono::Duration::hours(2),
            place_id: place_id.to_string(),
            organizer_telegram_id: organizer,
            organizer_username: None,
            organizer_first_name: None,
            organizer_last_name: None,
        }
    }

    #[test]
    fn every_place_gets_a_list() {
        let merged = attach_events(
            vec![place(1), place(2)],
            vec![event(10, "node/1"), event(11, "node/1")],
            &HashSet::new(),
        );
        assert_eq!(merged.len(), 2);
        let counts: Vec<usize> = merged.iter().map(|p| p.events.len()).collect();
        assert_eq!(counts, vec![2, 0]);
    }

    #[test]
    fn events_for_other_places_are_dropped() {
        let merged = attach_events(vec![place(1)], vec![event(10, "node/99")], &HashSet::new());
        assert!(merged.iter().all(|p| p.events.is_empty()));
    }

    #[test]
    fn place_order_is_preserved() {
        let merged = attach_events(vec![place(3), place(1), place(2)], Vec::new(), &HashSet::new());
        let ids: Vec<i64> = merged.iter().map(|p| p.place.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn favorites_are_flagged() {
        let favorites: HashSet<String> = ["node/2".to_string()].into_iter().collect();
        let merged = attach_events(vec![place(1), place(2)], Vec::new(), &favorites);
        let flags: Vec<bool> = merged.iter().map(|p| p.is_favorite).collect();
        assert_eq!(flags, vec![false, true]);
    }

    #[test]
    fn coordinates_are_range_checked() {
        assert!(validate_coordinates(36.88, 30.70).is_ok());
        assert!(validate_coordinates(91.0, 0.0).is_err());
        assert!(validate_coordinates(0.0, -181.0).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }
}
