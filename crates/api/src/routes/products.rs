//! Read-only product catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use domain::{Product, ShopRepository};

use super::{AppState, parse_entity_id};
use crate::error::ApiError;

/// GET /products
#[tracing::instrument(skip(state))]
pub async fn find_all<S: ShopRepository>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.products.find_all().await?))
}

/// GET /products/{id}
#[tracing::instrument(skip(state))]
pub async fn find_by_id<S: ShopRepository>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_entity_id(&id)?;
    Ok(Json(state.products.find_by_id(id).await?))
}
