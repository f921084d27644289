//! User management API handlers
//!
//! CRUD endpoints over user records. Handlers validate the request shape,
//! delegate to `UserService`, and map domain outcomes to status codes.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderName, StatusCode},
    Json,
};
use uuid::Uuid;

use super::dto::{CreateUserRequest, UpdateUserRequest, UserDto};
use crate::application::UserService;
use crate::domain::DomainError;
use crate::infrastructure::database::repositories::UserRepository;
use crate::interfaces::http::common::{ApiError, ErrorBody, ValidatedJson};

/// User handler state — concrete over `UserRepository` for Axum compatibility.
#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserService<UserRepository>>,
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = [UserDto]),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let users = state.user_service.list_users().await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = UserDto),
        (status = 404, description = "Not found", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserDto>, ApiError> {
    match state.user_service.get_user(id).await? {
        Some(user) => Ok(Json(UserDto::from(user))),
        None => Err(DomainError::user_not_found(id).into()),
    }
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<UserDto>), ApiError> {
    let user = state
        .user_service
        .create_user(
            request.id,
            &request.name,
            &request.login,
            &request.password,
            &request.role,
        )
        .await?;

    let location = format!("/api/users/{}", user.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(UserDto::from(user)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 204, description = "User updated"),
        (status = 400, description = "Validation error or id mismatch", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn update_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<StatusCode, ApiError> {
    if request.id != id {
        return Err(ApiError::bad_request("Path id does not match body id"));
    }

    state
        .user_service
        .update_user(
            id,
            &request.name,
            &request.login,
            request.password.as_deref(),
            &request.role,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "Not found", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.user_service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait};
    use sea_orm_migration::MigratorTrait;
    use serde_json::{json, Value};
    use tower::Service;
    use uuid::Uuid;

    use crate::config::AppConfig;
    use crate::infrastructure::crypto::password::verify_password;
    use crate::infrastructure::database::entities::user;
    use crate::infrastructure::database::migrator::Migrator;
    use crate::interfaces::http::create_api_router;

    // A single pooled connection keeps the in-memory database shared
    // between the router under test and the assertions below.
    async fn test_app() -> (Router, DatabaseConnection) {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1);
        let db = Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let mut cfg = AppConfig::default();
        cfg.security.bcrypt_cost = 4;

        (create_api_router(db.clone(), &cfg), db)
    }

    fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn read_json(resp: axum::http::Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn ana_body() -> Value {
        json!({
            "name": "Ana Silva",
            "login": "ana@example.com",
            "password": "secret1",
            "role": "admin"
        })
    }

    async fn create_ana(svc: &mut axum::routing::RouterIntoService<Body>) -> Uuid {
        let resp = svc
            .call(json_request("POST", "/api/users", &ana_body()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = read_json(resp).await;
        body["id"].as_str().unwrap().parse().unwrap()
    }

    #[tokio::test]
    async fn create_returns_201_with_location_and_no_password() {
        let (app, db) = test_app().await;
        let mut svc = app.into_service();

        let resp = svc
            .call(json_request("POST", "/api/users", &ana_body()))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::CREATED);
        let location = resp
            .headers()
            .get("location")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let body = read_json(resp).await;

        let id = body["id"].as_str().unwrap();
        assert_eq!(location, format!("/api/users/{}", id));
        assert_eq!(body["name"], "Ana Silva");
        assert_eq!(body["login"], "ana@example.com");
        assert_eq!(body["role"], "admin");
        assert!(body.get("password").is_none());
        assert!(body.get("password_hash").is_none());

        // the stored column holds a verifying hash, never the plaintext
        let stored = user::Entity::find_by_id(id.parse::<Uuid>().unwrap())
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password_hash, "secret1");
        assert!(verify_password("secret1", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn create_with_invalid_email_persists_nothing() {
        let (app, db) = test_app().await;
        let mut svc = app.into_service();

        let mut body = ana_body();
        body["login"] = json!("not-an-email");
        let resp = svc
            .call(json_request("POST", "/api/users", &body))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let err = read_json(resp).await;
        assert!(err["message"].as_str().unwrap().contains("login"));

        assert_eq!(user::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn create_name_length_is_enforced() {
        let (app, _db) = test_app().await;
        let mut svc = app.into_service();

        for name in ["ab", &"x".repeat(201)] {
            let mut body = ana_body();
            body["name"] = json!(name);
            let resp = svc
                .call(json_request("POST", "/api/users", &body))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn create_with_malformed_body_returns_400() {
        let (app, _db) = test_app().await;
        let mut svc = app.into_service();

        let req = Request::builder()
            .method("POST")
            .uri("/api/users")
            .header("content-type", "application/json")
            .body(Body::from("not json"))
            .unwrap();

        let resp = svc.call(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_returns_created_users() {
        let (app, _db) = test_app().await;
        let mut svc = app.into_service();
        create_ana(&mut svc).await;

        let resp = svc.call(empty_request("GET", "/api/users")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = read_json(resp).await;
        let users = body.as_array().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["login"], "ana@example.com");
        assert!(users[0].get("password").is_none());
    }

    #[tokio::test]
    async fn get_roundtrip_returns_same_fields() {
        let (app, _db) = test_app().await;
        let mut svc = app.into_service();
        let id = create_ana(&mut svc).await;

        let resp = svc
            .call(empty_request("GET", &format!("/api/users/{}", id)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = read_json(resp).await;
        assert_eq!(body["id"], id.to_string());
        assert_eq!(body["name"], "Ana Silva");
        assert_eq!(body["login"], "ana@example.com");
        assert_eq!(body["role"], "admin");
    }

    #[tokio::test]
    async fn missing_id_returns_404_for_get_update_delete() {
        let (app, _db) = test_app().await;
        let mut svc = app.into_service();
        let id = Uuid::new_v4();
        let uri = format!("/api/users/{}", id);

        let resp = svc.call(empty_request("GET", &uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let update = json!({
            "id": id,
            "name": "Ana Silva",
            "login": "ana@example.com",
            "password": "",
            "role": "admin"
        });
        let resp = svc.call(json_request("PUT", &uri, &update)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = svc.call(empty_request("DELETE", &uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_with_blank_password_keeps_stored_hash() {
        let (app, db) = test_app().await;
        let mut svc = app.into_service();
        let id = create_ana(&mut svc).await;

        let before = user::Entity::find_by_id(id).one(&db).await.unwrap().unwrap();

        let update = json!({
            "id": id,
            "name": "Ana Souza",
            "login": "ana.souza@example.com",
            "password": "",
            "role": "manager"
        });
        let resp = svc
            .call(json_request("PUT", &format!("/api/users/{}", id), &update))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let after = user::Entity::find_by_id(id).one(&db).await.unwrap().unwrap();
        assert_eq!(after.name, "Ana Souza");
        assert_eq!(after.login, "ana.souza@example.com");
        assert_eq!(after.role, "manager");
        assert_eq!(after.password_hash, before.password_hash);
        assert!(verify_password("secret1", &after.password_hash).unwrap());
    }

    #[tokio::test]
    async fn update_with_new_password_replaces_hash() {
        let (app, db) = test_app().await;
        let mut svc = app.into_service();
        let id = create_ana(&mut svc).await;

        let update = json!({
            "id": id,
            "name": "Ana Silva",
            "login": "ana@example.com",
            "password": "another-secret",
            "role": "admin"
        });
        let resp = svc
            .call(json_request("PUT", &format!("/api/users/{}", id), &update))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let stored = user::Entity::find_by_id(id).one(&db).await.unwrap().unwrap();
        assert!(!verify_password("secret1", &stored.password_hash).unwrap());
        assert!(verify_password("another-secret", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn update_with_mismatched_ids_mutates_nothing() {
        let (app, db) = test_app().await;
        let mut svc = app.into_service();
        let id = create_ana(&mut svc).await;

        let update = json!({
            "id": Uuid::new_v4(),
            "name": "Mallory",
            "login": "mallory@example.com",
            "password": "",
            "role": "admin"
        });
        let resp = svc
            .call(json_request("PUT", &format!("/api/users/{}", id), &update))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let stored = user::Entity::find_by_id(id).one(&db).await.unwrap().unwrap();
        assert_eq!(stored.name, "Ana Silva");
    }

    #[tokio::test]
    async fn delete_makes_later_operations_404() {
        let (app, _db) = test_app().await;
        let mut svc = app.into_service();
        let id = create_ana(&mut svc).await;
        let uri = format!("/api/users/{}", id);

        let resp = svc.call(empty_request("DELETE", &uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = svc.call(empty_request("GET", &uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = svc.call(empty_request("DELETE", &uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let update = json!({
            "id": id,
            "name": "Ana Silva",
            "login": "ana@example.com",
            "password": "",
            "role": "admin"
        });
        let resp = svc.call(json_request("PUT", &uri, &update)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn duplicate_logins_are_accepted() {
        let (app, db) = test_app().await;
        let mut svc = app.into_service();

        create_ana(&mut svc).await;
        let resp = svc
            .call(json_request("POST", "/api/users", &ana_body()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        assert_eq!(user::Entity::find().count(&db).await.unwrap(), 2);
    }
}
