//! Service layer: business logic orchestration.
//!
//! [`PoolService`] sequences every pool operation: authorize, resolve,
//! mutate through the domain entity, persist, and record audit
//! snapshots where required.

pub mod pool_service;

pub use pool_service::{PoolCreate, PoolService, PoolUpdate};
