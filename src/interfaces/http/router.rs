//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{http::HeaderValue, routing::get, Router};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::UserService;
use crate::config::AppConfig;
use crate::infrastructure::database::repositories::UserRepository;
use crate::interfaces::http::common::ErrorBody;
use crate::interfaces::http::modules::{health, users};

use health::handlers::HealthState;
use users::handlers::UserHandlerState;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::handlers::health_check,
        // Users
        users::handlers::list_users,
        users::handlers::get_user,
        users::handlers::create_user,
        users::handlers::update_user,
        users::handlers::delete_user,
    ),
    components(
        schemas(
            users::dto::UserDto,
            users::dto::CreateUserRequest,
            users::dto::UpdateUserRequest,
            ErrorBody,
            health::handlers::HealthResponse,
            health::handlers::ComponentHealth,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Users", description = "User CRUD operations"),
    ),
    info(
        title = "Users API",
        version = "1.0.0",
        description = "REST API for managing user records",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(db: DatabaseConnection, config: &AppConfig) -> Router {
    let repo = Arc::new(UserRepository::new(db.clone()));
    let user_state = UserHandlerState {
        user_service: Arc::new(UserService::new(repo, config.security.bcrypt_cost)),
    };

    let health_state = HealthState {
        db,
        started_at: Arc::new(Instant::now()),
    };

    // CORS: exactly one trusted origin, any method and header from it
    let cors = match config.cors.allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => {
            tracing::warn!(
                origin = %config.cors.allowed_origin,
                "invalid CORS origin in config, cross-origin requests will be refused"
            );
            CorsLayer::new().allow_methods(Any).allow_headers(Any)
        }
    };

    let user_routes = Router::new()
        .route(
            "/",
            get(users::handlers::list_users).post(users::handlers::create_user),
        )
        .route(
            "/{id}",
            get(users::handlers::get_user)
                .put(users::handlers::update_user)
                .delete(users::handlers::delete_user),
        )
        .with_state(user_state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route(
            "/health",
            get(health::handlers::health_check).with_state(health_state),
        )
        // Users
        .nest("/api/users", user_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
