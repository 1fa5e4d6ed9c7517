//! User CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{OriginalUri, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use domain::{ShopRepository, User};
use serde::Deserialize;

use super::{AppState, parse_entity_id, resource_location};
use crate::error::ApiError;

// -- Request types --

/// Body of `POST /users` and `PUT /users/{id}`.
///
/// Unknown keys, including an `id`, are ignored.
#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub password: String,
}

impl From<UserRequest> for User {
    fn from(req: UserRequest) -> Self {
        User::new(req.name, req.email, req.phone, req.password)
    }
}

// -- Handlers --

/// GET /users lists every user.
#[tracing::instrument(skip(state))]
pub async fn find_all<S: ShopRepository>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.users.find_all().await?))
}

/// GET /users/{id} loads one user.
#[tracing::instrument(skip(state))]
pub async fn find_by_id<S: ShopRepository>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id = parse_entity_id(&id)?;
    Ok(Json(state.users.find_by_id(id).await?))
}

/// POST /users creates a user and points `Location` at it.
#[tracing::instrument(skip(state, headers, payload))]
pub async fn insert<S: ShopRepository>(
    State(state): State<Arc<AppState<S>>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let user = state.users.insert(req.into()).await?;
    let id = user
        .id
        .ok_or_else(|| ApiError::Internal("store returned a user without an id".to_string()))?;

    let location = resource_location(&headers, &uri, id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(user)))
}

/// PUT /users/{id} updates name, email and phone of an existing user.
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: ShopRepository>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let id = parse_entity_id(&id)?;
    let Json(req) = payload?;
    Ok(Json(state.users.update(id, req.into()).await?))
}

/// DELETE /users/{id} removes a user that owns no orders.
#[tracing::instrument(skip(state))]
pub async fn delete<S: ShopRepository>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_entity_id(&id)?;
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
