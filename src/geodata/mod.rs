//! External geodata gateway: Overpass for points of interest, Nominatim
//! for resolving a region name to a bounding box.
//!
//! Plain request/response with no retry, backoff or cache. Any non-2xx
//! status or undecodable body becomes
//! [`crate::error::ExplorerError::UpstreamUnavailable`].

pub mod client;
pub mod models;
pub mod query;

pub use client::GeodataGateway;
pub use models::{BoundingBox, OsmElement};
