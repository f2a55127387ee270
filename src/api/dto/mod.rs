//! Data Transfer Objects for REST request/response serialization.
//!
//! Request bodies implement [`crate::api::extract::Validate`] and are
//! taken through [`crate::api::extract::ValidatedJson`].

pub mod common_dto;
pub mod event_dto;
pub mod location_dto;
pub mod reply_dto;
pub mod user_dto;

pub use common_dto::*;
pub use event_dto::*;
pub use location_dto::*;
pub use reply_dto::*;
pub use user_dto::*;
