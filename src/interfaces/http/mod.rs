//! HTTP REST API interfaces
//!
//! - `common`: error body shape and validated JSON extraction
//! - `modules`: request handlers per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod modules;
pub mod router;

pub use router::create_api_router;
