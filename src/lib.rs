//! # booru-pools
//!
//! REST API service for post-pool management in a booru-style image
//! board. A pool groups posts under shared names, a category, an
//! optional description, and an explicit post ordering; this service
//! exposes authorization-gated CRUD over pools and their memberships,
//! with audit snapshots for metadata-level mutations.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── AuthUser extractor + PrivilegeChecker (auth)
//!     │
//!     ├── PoolService (service/)
//!     ├── Pool aggregate (domain/)
//!     │
//!     └── PoolStore / PostStore / SnapshotStore (persistence/)
//!           ├── PostgresStore
//!           └── MemoryStore
//! ```

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
