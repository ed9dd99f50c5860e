//! Data Transfer Objects for REST request/response serialization.
//!
//! Request bodies use camelCase keys; pool responses are built by
//! [`pool_dto::serialize_pool`] so callers can select output fields.

pub mod common_dto;
pub mod pool_dto;

pub use common_dto::*;
pub use pool_dto::*;
