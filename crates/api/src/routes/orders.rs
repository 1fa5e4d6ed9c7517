//! Read-only order endpoints.
//!
//! Orders are serialized with their client, their line items (each with
//! its `subTotal`, without the back-reference to the order) and `total`.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use domain::{Order, ShopRepository};

use super::{AppState, parse_entity_id};
use crate::error::ApiError;

/// GET /orders
#[tracing::instrument(skip(state))]
pub async fn find_all<S: ShopRepository>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.orders.find_all().await?))
}

/// GET /orders/{id}
#[tracing::instrument(skip(state))]
pub async fn find_by_id<S: ShopRepository>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let id = parse_entity_id(&id)?;
    Ok(Json(state.orders.find_by_id(id).await?))
}
