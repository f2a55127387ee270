//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ExplorerConfig;
use crate::error::ExplorerError;
use crate::geodata::GeodataGateway;
use crate::persistence::PostgresPersistence;
use crate::service::{EventService, LocationService, ReplyService, UserService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Command and message lookups.
    pub replies: Arc<ReplyService>,
    /// Profiles and user-side associations.
    pub users: Arc<UserService>,
    /// Event CRUD.
    pub events: Arc<EventService>,
    /// Geodata lookups merged with events.
    pub locations: Arc<LocationService>,
}

impl AppState {
    /// Wires every service onto one pool.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::Internal`] if the geodata HTTP client
    /// cannot be built.
    pub fn new(pool: PgPool, config: &ExplorerConfig) -> Result<Self, ExplorerError> {
        let store = PostgresPersistence::new(pool);
        let gateway = GeodataGateway::new(config.geodata.clone())?;
        Ok(Self {
            replies: Arc::new(ReplyService::new(store.clone(), config.replies.clone())),
            users: Arc::new(UserService::new(store.clone())),
            events: Arc::new(EventService::new(store.clone())),
            locations: Arc::new(LocationService::new(store, gateway)),
        })
    }
}
