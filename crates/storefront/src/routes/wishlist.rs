//! Wishlist route handlers.

use axum::{
    Json,
    extract::{Path, rejection::JsonRejection},
};
use marche_core::{Product, Variant, Wishlist, WishlistItem};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::actions::toggle_wishlist_with_notification;
use crate::error::Result;
use crate::middleware::CurrentShopper;
use crate::routes::ItemView;
use crate::shopper::Shopper;

/// Wishlist display data.
#[derive(Debug, Clone, Serialize)]
pub struct WishlistView {
    pub items: Vec<ItemView<WishlistItem>>,
    pub count: usize,
}

impl From<&Wishlist> for WishlistView {
    fn from(wishlist: &Wishlist) -> Self {
        Self {
            items: wishlist.items().iter().map(ItemView::of).collect(),
            count: wishlist.len(),
        }
    }
}

/// Wishlist after a toggle, with the product's new membership.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleView {
    pub in_wishlist: bool,
    #[serde(flatten)]
    pub wishlist: WishlistView,
}

/// Product reference for wishlist requests.
#[derive(Debug, Deserialize)]
pub struct WishlistRequest {
    pub product: Product,
    #[serde(default)]
    pub variant: Option<Variant>,
}

fn view(shopper: &Shopper) -> WishlistView {
    shopper.wishlist().read(|wishlist| WishlistView::from(wishlist))
}

/// Show saved products.
#[instrument(skip_all)]
pub async fn show(CurrentShopper(shopper): CurrentShopper) -> Json<WishlistView> {
    Json(view(&shopper))
}

/// Save a product. Saving it twice keeps a single entry.
///
/// # Errors
///
/// Returns a JSON rejection for a malformed body.
#[instrument(skip_all)]
pub async fn add(
    CurrentShopper(shopper): CurrentShopper,
    payload: std::result::Result<Json<WishlistRequest>, JsonRejection>,
) -> Result<Json<WishlistView>> {
    let Json(request) = payload?;
    if shopper.add_to_wishlist(&request.product, request.variant.as_ref()) {
        tracing::info!(product_id = %request.product.id, "Saved to wishlist");
    }
    Ok(Json(view(&shopper)))
}

/// Toggle a product's saved state and announce the change.
///
/// # Errors
///
/// Returns a JSON rejection for a malformed body.
#[instrument(skip_all)]
pub async fn toggle(
    CurrentShopper(shopper): CurrentShopper,
    payload: std::result::Result<Json<WishlistRequest>, JsonRejection>,
) -> Result<Json<ToggleView>> {
    let Json(request) = payload?;
    let in_wishlist =
        toggle_wishlist_with_notification(&shopper, &request.product, request.variant.as_ref());
    Ok(Json(ToggleView {
        in_wishlist,
        wishlist: view(&shopper),
    }))
}

/// Remove a saved entry by id. Unknown ids leave the wishlist unchanged.
#[instrument(skip_all, fields(item_id = %id))]
pub async fn remove(
    CurrentShopper(shopper): CurrentShopper,
    Path(id): Path<String>,
) -> Json<WishlistView> {
    shopper.remove_from_wishlist(&id);
    Json(view(&shopper))
}

/// Remove every saved entry.
#[instrument(skip_all)]
pub async fn clear(CurrentShopper(shopper): CurrentShopper) -> Json<WishlistView> {
    shopper.clear_wishlist();
    Json(view(&shopper))
}
