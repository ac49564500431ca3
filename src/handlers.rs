//! HTTP Handlers
//!
//! REST endpoints and route assembly. Failure bodies are produced by
//! `ApiError`; success bodies carry the original service's envelope shape.

use crate::error::ApiError;
use crate::extractors::{AuthUser, BasicCredentials};
use crate::models::{PublicUser, RegisterRequest, TokenResponse, UpdateProfileRequest};
use crate::AppContext;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Assemble the full API router
pub fn create_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route(
            "/api/users",
            post(register).get(list_users).patch(update_profile),
        )
        .route("/api/users/:id", get(get_user))
        .route("/api/auth", post(login))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// POST /api/users
///
/// Register a new user account
pub async fn register(
    State(ctx): State<Arc<AppContext>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = ctx.auth.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "success",
            "user": PublicUser::from(user)
        })),
    ))
}

/// POST /api/auth
///
/// Exchange Basic credentials for a bearer token
pub async fn login(
    State(ctx): State<Arc<AppContext>>,
    creds: BasicCredentials,
) -> Result<impl IntoResponse, ApiError> {
    let token = ctx.auth.login(&creds.email, &creds.password).await?;
    Ok(Json(TokenResponse { token }))
}

/// GET /api/users
///
/// List all users
pub async fn list_users(
    State(ctx): State<Arc<AppContext>>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let users = ctx.profile.list().await?;
    let users: Vec<PublicUser> = users.iter().map(PublicUser::from).collect();

    Ok(Json(serde_json::json!({
        "message": "success",
        "users": users
    })))
}

/// GET /api/users/:id
///
/// Fetch a single user by id
pub async fn get_user(
    State(ctx): State<Arc<AppContext>>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user = ctx.profile.get(&id).await?;

    Ok(Json(serde_json::json!({
        "message": "success",
        "user": PublicUser::from(user)
    })))
}

/// PATCH /api/users
///
/// Update the authenticated caller's own record
pub async fn update_profile(
    State(ctx): State<Arc<AppContext>>,
    AuthUser(identity): AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = ctx.profile.update_own(&identity, req).await?;

    Ok(Json(serde_json::json!({
        "message": "success",
        "user": PublicUser::from(user)
    })))
}
