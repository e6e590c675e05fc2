//! User and follow routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use super::article_routes::ToggleResponse;
use super::errors::{actor, require_actor};
use crate::errors::DataError;
use crate::identity::EntityRef;
use crate::model::User;
use crate::service::ContentService;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(flatten)]
    pub user: User,
    pub follower_count: u64,
    pub following_count: u64,
    /// Whether the requesting actor follows this user
    pub is_following: bool,
}

/// Create user routes
pub fn user_routes(service: Arc<ContentService>) -> Router {
    Router::new()
        .route("/users/:reference", get(get_user_handler))
        .route("/usernames/:username", get(get_user_by_username_handler))
        .route("/users/:reference/follow", post(toggle_follow_handler))
        .with_state(service)
}

async fn user_response(
    service: &ContentService,
    user: User,
    viewer: Option<String>,
) -> Result<UserResponse, DataError> {
    let reference = EntityRef::parse(&user.id);
    let follower_count = service.follower_count(&reference).await?;
    let following_count = service.following_count(&reference).await?;
    let is_following = match viewer {
        Some(viewer) => service.is_following(&reference, &viewer).await?,
        None => false,
    };
    Ok(UserResponse {
        user,
        follower_count,
        following_count,
        is_following,
    })
}

async fn get_user_handler(
    State(service): State<Arc<ContentService>>,
    headers: HeaderMap,
    Path(reference): Path<String>,
) -> Result<Json<UserResponse>, DataError> {
    let user = service.get_user(&EntityRef::parse(&reference)).await?;
    Ok(Json(user_response(&service, user, actor(&headers)).await?))
}

async fn get_user_by_username_handler(
    State(service): State<Arc<ContentService>>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, DataError> {
    let user = service.get_user_by_username(&username).await?;
    Ok(Json(user_response(&service, user, actor(&headers)).await?))
}

async fn toggle_follow_handler(
    State(service): State<Arc<ContentService>>,
    headers: HeaderMap,
    Path(reference): Path<String>,
) -> Result<Json<ToggleResponse>, DataError> {
    let actor = require_actor(&headers)?;
    let active = service
        .toggle_follow(&EntityRef::parse(&reference), &actor)
        .await?;
    Ok(Json(ToggleResponse { active }))
}
