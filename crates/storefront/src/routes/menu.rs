//! Menu route handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::Result;
use crate::models::product::Product;
use crate::state::AppState;

/// List the menu.
///
/// Returns every product on offer, sorted by name. Prices here are the
/// catalog's own; nothing client-side ever feeds back into them.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state.catalog().menu().await?;
    Ok(Json(products))
}
