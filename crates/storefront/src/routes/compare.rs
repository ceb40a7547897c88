//! Product comparison route handlers.
//!
//! Adds answer with `{ success, message }`. A refused add (duplicate or full
//! list) is a 409 so clients can branch on status alone.

use axum::{
    Json,
    extract::{Path, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use marche_core::{CompareItem, CompareList, CompareOutcome, Product, ProductId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::actions::toggle_compare_with_notification;
use crate::error::Result;
use crate::middleware::CurrentShopper;
use crate::routes::ItemView;
use crate::shopper::Shopper;

/// Comparison display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareView {
    pub items: Vec<ItemView<CompareItem>>,
    pub max_items: usize,
}

impl From<&CompareList> for CompareView {
    fn from(list: &CompareList) -> Self {
        Self {
            items: list.items().iter().map(ItemView::of).collect(),
            max_items: list.max_items(),
        }
    }
}

/// Product to add or toggle.
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub product: Product,
}

fn view(shopper: &Shopper) -> CompareView {
    shopper.compare().read(|list| CompareView::from(list))
}

fn outcome_response(outcome: CompareOutcome) -> Response {
    let status = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::CONFLICT
    };
    (status, Json(outcome)).into_response()
}

/// Show compared products.
#[instrument(skip_all)]
pub async fn show(CurrentShopper(shopper): CurrentShopper) -> Json<CompareView> {
    Json(view(&shopper))
}

/// Add a product to the comparison.
///
/// # Errors
///
/// Returns a JSON rejection for a malformed body.
#[instrument(skip_all)]
pub async fn add(
    CurrentShopper(shopper): CurrentShopper,
    payload: std::result::Result<Json<CompareRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = payload?;
    let outcome = CompareOutcome::from(shopper.add_to_compare(&request.product));
    if !outcome.success {
        tracing::debug!(product_id = %request.product.id, reason = %outcome.message, "Compare add refused");
    }
    Ok(outcome_response(outcome))
}

/// Toggle a product in the comparison and announce the outcome.
///
/// # Errors
///
/// Returns a JSON rejection for a malformed body.
#[instrument(skip_all)]
pub async fn toggle(
    CurrentShopper(shopper): CurrentShopper,
    payload: std::result::Result<Json<CompareRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = payload?;
    let outcome = toggle_compare_with_notification(&shopper, &request.product);
    Ok(outcome_response(outcome))
}

/// Remove a product. Unknown ids leave the comparison unchanged.
#[instrument(skip_all, fields(product_id = %product_id))]
pub async fn remove(
    CurrentShopper(shopper): CurrentShopper,
    Path(product_id): Path<String>,
) -> Json<CompareView> {
    shopper.remove_from_compare(&ProductId::new(product_id));
    Json(view(&shopper))
}

/// Empty the comparison.
#[instrument(skip_all)]
pub async fn clear(CurrentShopper(shopper): CurrentShopper) -> Json<CompareView> {
    shopper.clear_compare();
    Json(view(&shopper))
}
