//! Domain layer: identifiers, users, and the pool aggregate.
//!
//! This module contains the server-side domain model: typed identifiers,
//! the acting user with its authorization rank, and the [`Pool`] entity
//! whose mutator methods enforce all membership and naming invariants.

pub mod ids;
pub mod pool;
pub mod user;

pub use ids::{PoolId, PostId};
pub use pool::{Pool, PoolPost, Post};
pub use user::{Rank, User};
