//! # Users API
//!
//! REST service exposing CRUD operations over user records stored in a
//! relational database.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, errors and repository traits
//! - **application**: Business logic and use cases (`UserService`)
//! - **infrastructure**: External concerns (database, migrations, password hashing)
//! - **interfaces**: REST API with Swagger documentation

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::create_api_router;
