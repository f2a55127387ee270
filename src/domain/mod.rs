//! Domain layer: identifiers, roles and event timing.
//!
//! These types carry the invariants the rest of the service relies on:
//! a [`TelegramId`] is the only key ever used to reference a user, a
//! [`PlaceId`] is the external geodata id shared between stored events
//! and live lookups, and an [`EventWindow`] always ends after it starts.

pub mod event_window;
pub mod place_id;
pub mod telegram_id;
pub mod user_role;

pub use event_window::EventWindow;
pub use place_id::{ElementType, PlaceId};
pub use telegram_id::TelegramId;
pub use user_role::UserRole;
