//! Service layer: business logic orchestration.
//!
//! Each service owns a clone of [`crate::persistence::PostgresPersistence`]
//! (a pool handle, cheap to clone) and, for locations, the
//! [`crate::geodata::GeodataGateway`]. Services enforce existence checks
//! and derived state; handlers only translate between HTTP and them.

pub mod event_service;
pub mod location_service;
pub mod reply_service;
pub mod user_service;

pub use event_service::EventService;
pub use location_service::LocationService;
pub use reply_service::ReplyService;
pub use user_service::UserService;
