//! REST endpoint handlers organized by resource.

pub mod commands;
pub mod events;
pub mod locations;
pub mod messages;
pub mod subscriptions;
pub mod system;
pub mod users;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(commands::routes())
        .merge(messages::routes())
        .merge(users::routes())
        .merge(subscriptions::routes())
        .merge(events::routes())
        .merge(locations::routes())
}
