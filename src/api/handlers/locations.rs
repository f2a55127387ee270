//! Geodata lookups merged with local events.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    CallerQuery, LocationQuery, PlaceDto, PlaceResponse, PlacesResponse, SearchQuery,
};
use crate::api::extract::{ApiPath, ApiQuery, Validate};
use crate::app_state::AppState;
use crate::domain::PlaceId;
use crate::error::{ErrorResponse, ExplorerError};

/// `GET /locations/`: Eating and drinking places around a point.
///
/// # Errors
///
/// Returns [`ExplorerError::InvalidRequest`] for bad coordinates and
/// [`ExplorerError::UpstreamUnavailable`] if the geodata service fails.
#[utoipa::path(
    get,
    path = "/locations/",
    tag = "Locations",
    summary = "Places around a point",
    description = "Queries the geodata service for amenities around the point and attaches every local event at each place that has not ended yet.",
    params(LocationQuery),
    responses(
        (status = 200, description = "Places, possibly none", body = PlacesResponse),
        (status = 400, description = "Invalid coordinates or radius", body = ErrorResponse),
        (status = 404, description = "Location fetch failed", body = ErrorResponse),
    )
)]
pub async fn places_around(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LocationQuery>,
) -> Result<impl IntoResponse, ExplorerError> {
    query.validate()?;
    let places = state
        .locations
        .around(
            query.telegram_id.as_ref(),
            query.latitude,
            query.longitude,
            query.radius,
        )
        .await?;
    Ok(Json(PlacesResponse {
        telegram_id: query.telegram_id,
        response: places.into_iter().map(PlaceDto::from).collect(),
    }))
}

/// `GET /locations/search/`: Places by name within a region.
///
/// # Errors
///
/// Returns [`ExplorerError::NotFound`] for an unknown region and
/// [`ExplorerError::UpstreamUnavailable`] if the geodata service fails.
#[utoipa::path(
    get,
    path = "/locations/search/",
    tag = "Locations",
    summary = "Search places in a region",
    params(SearchQuery),
    responses(
        (status = 200, description = "Places, possibly none", body = PlacesResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Region not found or location fetch failed", body = ErrorResponse),
    )
)]
pub async fn search_places(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<impl IntoResponse, ExplorerError> {
    query.validate()?;
    let places = state
        .locations
        .search(
            query.telegram_id.as_ref(),
            query.region_name.trim(),
            query.place_name.trim(),
        )
        .await?;
    Ok(Json(PlacesResponse {
        telegram_id: query.telegram_id,
        response: places.into_iter().map(PlaceDto::from).collect(),
    }))
}

/// `GET /places/{place_id}`: One place by external id.
///
/// The id may contain a slash, e.g. `/places/node/55`.
///
/// # Errors
///
/// Returns [`ExplorerError::InvalidRequest`] for a malformed id,
/// [`ExplorerError::NotFound`] if the provider does not know the place and
/// [`ExplorerError::UpstreamUnavailable`] if the geodata service fails.
#[utoipa::path(
    get,
    path = "/places/{place_id}",
    tag = "Locations",
    summary = "Get a place",
    params(("place_id" = String, Path, description = "External id, e.g. `node/55`"), CallerQuery),
    responses(
        (status = 200, description = "The place", body = PlaceResponse),
        (status = 400, description = "Malformed place id", body = ErrorResponse),
        (status = 404, description = "Place not found or location fetch failed", body = ErrorResponse),
    )
)]
pub async fn get_place(
    State(state): State<AppState>,
    ApiPath(raw_id): ApiPath<String>,
    ApiQuery(caller): ApiQuery<CallerQuery>,
) -> Result<impl IntoResponse, ExplorerError> {
    let place_id = PlaceId::parse(&raw_id)?;
    let place = state
        .locations
        .place(caller.telegram_id.as_ref(), place_id)
        .await?;
    Ok(Json(PlaceResponse {
        telegram_id: caller.telegram_id,
        response: place.into(),
    }))
}

/// Location routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/locations/", get(places_around))
        .route("/locations/search/", get(search_places))
        .route("/places/{*place_id}", get(get_place))
}
