//! HTTP client for the Overpass interpreter and Nominatim search.

use reqwest::Client;

use super::models::{BoundingBox, NominatimPlace, OsmElement, OverpassResponse};
use super::query;
use crate::config::GeodataConfig;
use crate::domain::PlaceId;
use crate::error::ExplorerError;

/// Stateless gateway to the public map-data services.
#[derive(Debug, Clone)]
pub struct GeodataGateway {
    http: Client,
    config: GeodataConfig,
}

impl GeodataGateway {
    /// Builds the gateway and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::Internal`] if the TLS backend cannot be
    /// initialised.
    pub fn new(config: GeodataConfig) -> Result<Self, ExplorerError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ExplorerError::Internal(format!("http client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Gateway settings.
    #[must_use]
    pub fn config(&self) -> &GeodataConfig {
        &self.config
    }

    /// Amenity nodes within `radius_meters` of the given point.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::UpstreamUnavailable`] on any upstream failure.
    pub async fn places_around(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: u32,
    ) -> Result<Vec<OsmElement>, ExplorerError> {
        self.interpret(&query::around(latitude, longitude, radius_meters))
            .await
    }

    /// Elements with the given external ids. Unknown ids are simply absent.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::UpstreamUnavailable`] on any upstream failure.
    pub async fn places_by_ids(&self, ids: &[PlaceId]) -> Result<Vec<OsmElement>, ExplorerError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.interpret(&query::by_ids(ids)).await
    }

    /// A single element by id, `None` if the provider does not know it.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::UpstreamUnavailable`] on any upstream failure.
    pub async fn place_by_id(&self, id: PlaceId) -> Result<Option<OsmElement>, ExplorerError> {
        let elements = self.places_by_ids(&[id]).await?;
        Ok(elements.into_iter().find(|e| e.place_id() == id))
    }

    /// Amenity nodes named like `place_name` inside the region called
    /// `region_name`, capped at the configured result limit.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::NotFound`] if the region cannot be
    /// geocoded, [`ExplorerError::UpstreamUnavailable`] on upstream failure.
    pub async fn search_in_region(
        &self,
        region_name: &str,
        place_name: &str,
    ) -> Result<Vec<OsmElement>, ExplorerError> {
        let bbox = self
            .geocode(region_name)
            .await?
            .ok_or_else(|| ExplorerError::not_found("region", region_name))?;
        self.interpret(&query::named_in_bbox(
            place_name,
            &bbox,
            self.config.search_result_limit,
        ))
        .await
    }

    /// Resolves a region name to the bounding box of its best match.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::UpstreamUnavailable`] on any upstream failure.
    pub async fn geocode(&self, region_name: &str) -> Result<Option<BoundingBox>, ExplorerError> {
        let response = self
            .http
            .get(&self.config.nominatim_url)
            .query(&[("q", region_name), ("format", "json"), ("limit", "1")])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, region_name, "nominatim returned non-success status");
            return Err(ExplorerError::UpstreamUnavailable(format!(
                "nominatim returned {status}"
            )));
        }
        let hits: Vec<NominatimPlace> = response.json().await?;
        tracing::debug!(region_name, hits = hits.len(), "nominatim lookup");
        hits.first().map(BoundingBox::try_from).transpose()
    }

    /// Runs an Overpass QL query.
    async fn interpret(&self, ql: &str) -> Result<Vec<OsmElement>, ExplorerError> {
        let response = self
            .http
            .get(&self.config.overpass_url)
            .query(&[("data", ql)])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "overpass returned non-success status");
            return Err(ExplorerError::UpstreamUnavailable(format!(
                "overpass returned {status}"
            )));
        }
        let body: OverpassResponse = response.json().await?;
        tracing::debug!(elements = body.elements.len(), "overpass query");
        Ok(body.elements)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::ElementType;
    use crate::error::ErrorKind;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer) -> GeodataGateway {
        let config = GeodataConfig {
            overpass_url: format!("{}/api/interpreter", server.uri()),
            nominatim_url: format!("{}/search", server.uri()),
            timeout_secs: 5,
            ..GeodataConfig::default()
        };
        let Ok(gateway) = GeodataGateway::new(config) else {
            panic!("client build failed");
        };
        gateway
    }

    fn cafe(id: i64, name: &str) -> serde_json::Value {
        serde_json::json!({
            "type": "node", "id": id, "lat": 36.88, "lon": 30.70,
            "tags": {"amenity": "cafe", "name": name}
        })
    }

    #[tokio::test]
    async fn places_around_sends_around_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/interpreter"))
            .and(query_param("data", query::around(36.88, 30.7, 200)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"elements": [cafe(55, "Kahve")]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let result = gateway(&server).places_around(36.88, 30.7, 200).await;
        let Ok(elements) = result else {
            panic!("expected elements");
        };
        assert_eq!(elements.len(), 1);
        assert_eq!(
            elements.first().map(OsmElement::place_id),
            Some(PlaceId::new(ElementType::Node, 55))
        );
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/interpreter"))
            .respond_with(ResponseTemplate::new(504))
            .mount(&server)
            .await;

        let result = gateway(&server).places_around(1.0, 2.0, 200).await;
        let Err(err) = result else {
            panic!("expected failure");
        };
        assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
    }

    #[tokio::test]
    async fn malformed_body_is_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/interpreter"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
            .mount(&server)
            .await;

        let result = gateway(&server).places_around(1.0, 2.0, 200).await;
        assert!(matches!(result, Err(ExplorerError::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn place_by_id_returns_none_for_unknown_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/interpreter"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"elements": []})))
            .mount(&server)
            .await;

        let result = gateway(&server)
            .place_by_id(PlaceId::new(ElementType::Node, 404))
            .await;
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn search_geocodes_region_then_queries_bbox() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Antalya"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"display_name": "Antalya, Türkiye",
                 "boundingbox": ["36.80", "36.95", "30.60", "30.80"]}
            ])))
            .expect(1)
            .mount(&server)
            .await;
        let bbox = BoundingBox {
            south: 36.80,
            west: 30.60,
            north: 36.95,
            east: 30.80,
        };
        Mock::given(method("GET"))
            .and(path("/api/interpreter"))
            .and(query_param("data", query::named_in_bbox("Kahve", &bbox, 10)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"elements": [cafe(1, "Kahve"), cafe(2, "Kahve Dünyası")]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let result = gateway(&server).search_in_region("Antalya", "Kahve").await;
        let Ok(elements) = result else {
            panic!("expected elements");
        };
        assert_eq!(elements.len(), 2);
    }

    #[tokio::test]
    async fn unknown_region_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let result = gateway(&server).search_in_region("Atlantis", "Bar").await;
        let Err(err) = result else {
            panic!("expected failure");
        };
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
