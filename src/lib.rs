//! # event-explorer
//!
//! REST backend for a chat bot that helps people find somewhere to eat or
//! drink and the events happening there.
//!
//! Places come live from OpenStreetMap (Overpass for amenities, Nominatim
//! for region names). Events, users, follows and favorites are stored in
//! PostgreSQL and keyed by telegram id. Every location response joins the
//! two: each place carries the local events at it that have not ended.
//!
//! ## Architecture
//!
//! ```text
//! Chat bot / HTTP clients
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── Services (service/)
//!     │     ├── ReplyService, UserService, EventService
//!     │     └── LocationService ── GeodataGateway (geodata/) ── Overpass, Nominatim
//!     │
//!     └── PostgresPersistence (persistence/) ── PostgreSQL
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod geodata;
pub mod persistence;
pub mod service;
