//! Location lookup parameters and the merged place/event response.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::extract::{Validate, require_text};
use crate::domain::{PlaceId, TelegramId};
use crate::error::ExplorerError;
use crate::persistence::models::ActiveEventRow;
use crate::service::location_service::{PlaceWithEvents, validate_coordinates};

/// Largest radius accepted by `GET /locations/`, in meters.
pub const MAX_RADIUS_METERS: u32 = 5_000;
/// Maximum length of region and place names in a search.
pub const MAX_SEARCH_TERM_LEN: usize = 128;

/// Query of `GET /locations/`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LocationQuery {
    /// Telegram id of the caller, used for `is_favorite`.
    #[serde(default)]
    pub telegram_id: Option<TelegramId>,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Search radius in meters; the configured default when omitted.
    #[serde(default)]
    pub radius: Option<u32>,
}

impl Validate for LocationQuery {
    fn validate(&self) -> Result<(), ExplorerError> {
        validate_coordinates(self.latitude, self.longitude)?;
        match self.radius {
            Some(r) if r == 0 || r > MAX_RADIUS_METERS => Err(ExplorerError::InvalidRequest(
                format!("radius must be between 1 and {MAX_RADIUS_METERS} meters"),
            )),
            _ => Ok(()),
        }
    }
}

/// Query of `GET /locations/search/`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Telegram id of the caller, used for `is_favorite`.
    #[serde(default)]
    pub telegram_id: Option<TelegramId>,
    /// Region to geocode, e.g. `Antalya`.
    pub region_name: String,
    /// Case-insensitive place name pattern.
    pub place_name: String,
}

impl Validate for SearchQuery {
    fn validate(&self) -> Result<(), ExplorerError> {
        require_text("region_name", &self.region_name, MAX_SEARCH_TERM_LEN)?;
        require_text("place_name", &self.place_name, MAX_SEARCH_TERM_LEN)
    }
}

/// A local event shown on a place.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlaceEventDto {
    /// Event id.
    pub id: i32,
    /// Name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Start, UTC.
    pub start_datetime: NaiveDateTime,
    /// End, UTC.
    pub end_datetime: NaiveDateTime,
    /// Telegram id of the organizer.
    pub organizer_telegram_id: TelegramId,
    /// Organizer's username or full name.
    pub organizer_name: String,
}

impl From<ActiveEventRow> for PlaceEventDto {
    fn from(row: ActiveEventRow) -> Self {
        let organizer_name = row.organizer_name();
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            start_datetime: row.start_datetime,
            end_datetime: row.end_datetime,
            organizer_telegram_id: row.organizer_telegram_id,
            organizer_name,
        }
    }
}

/// A geodata place with its upcoming and running local events.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlaceDto {
    /// External id, e.g. `node/55`.
    #[schema(value_type = String, example = "node/55")]
    pub place_id: PlaceId,
    /// `name` tag.
    pub name: Option<String>,
    /// Latitude, present for nodes.
    pub latitude: Option<f64>,
    /// Longitude, present for nodes.
    pub longitude: Option<f64>,
    /// All OSM tags.
    pub tags: BTreeMap<String, String>,
    /// Whether the caller has favorited this place.
    pub is_favorite: bool,
    /// Events at this place that have not ended. Possibly empty.
    pub events: Vec<PlaceEventDto>,
}

impl From<PlaceWithEvents> for PlaceDto {
    fn from(merged: PlaceWithEvents) -> Self {
        let place = merged.place;
        Self {
            place_id: place.place_id(),
            name: place.name().map(str::to_string),
            latitude: place.lat,
            longitude: place.lon,
            tags: place.tags,
            is_favorite: merged.is_favorite,
            events: merged.events.into_iter().map(PlaceEventDto::from).collect(),
        }
    }
}

/// Envelope of `GET /locations/` and `GET /locations/search/`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlacesResponse {
    /// Telegram id of the caller, if given.
    pub telegram_id: Option<TelegramId>,
    /// Places in provider order.
    pub response: Vec<PlaceDto>,
}

/// Envelope of `GET /places/{place_id}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlaceResponse {
    /// Telegram id of the caller, if given.
    pub telegram_id: Option<TelegramId>,
    /// The place.
    pub response: PlaceDto,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(radius: Option<u32>) -> LocationQuery {
        LocationQuery {
            telegram_id: None,
            latitude: 36.88,
            longitude: 30.70,
            radius,
        }
    }

    #[test]
    fn radius_bounds() {
        assert!(query(None).validate().is_ok());
        assert!(query(Some(200)).validate().is_ok());
        assert!(query(Some(0)).validate().is_err());
        assert!(query(Some(MAX_RADIUS_METERS + 1)).validate().is_err());
    }

    #[test]
    fn search_terms_must_not_be_blank() {
        let q = SearchQuery {
            telegram_id: None,
            region_name: "Antalya".to_string(),
            place_name: " ".to_string(),
        };
        assert!(q.validate().is_err());
    }
}
