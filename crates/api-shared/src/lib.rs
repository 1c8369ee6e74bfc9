//! # API Shared
//!
//! Shared definitions for the Nirogya APIs.
//!
//! Contains:
//! - Request/response bodies of the REST API (`dto` module), with OpenAPI schemas
//! - Shared services like `HealthService`

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
