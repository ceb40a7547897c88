//! Cart route handlers.
//!
//! Every mutation answers with the full cart view so clients can re-render
//! the cart panel from a single response.

use axum::{
    Json,
    extract::{Path, rejection::JsonRejection},
};
use marche_core::{Cart, LineItem, Product, Variant, format_fcfa};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::actions::add_to_cart_with_notification;
use crate::error::{AppError, Result};
use crate::middleware::CurrentShopper;
use crate::routes::ItemView;

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<ItemView<LineItem>>,
    pub total_items: u64,
    pub subtotal: Decimal,
    pub total_savings: Decimal,
    pub subtotal_display: String,
    pub is_open: bool,
    pub last_added_item: Option<LineItem>,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let subtotal = cart.subtotal();
        Self {
            items: cart.items().iter().map(ItemView::of).collect(),
            total_items: cart.total_items(),
            subtotal,
            total_savings: cart.total_savings(),
            subtotal_display: format_fcfa(subtotal),
            is_open: cart.is_open(),
            last_added_item: cart.last_added_item().cloned(),
        }
    }
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product: Product,
    #[serde(default)]
    pub variant: Option<Variant>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

fn view(shopper: &crate::shopper::Shopper) -> Json<CartView> {
    Json(shopper.cart().read(|cart| CartView::from(cart)))
}

/// Show the cart.
#[instrument(skip_all)]
pub async fn show(CurrentShopper(shopper): CurrentShopper) -> Json<CartView> {
    view(&shopper)
}

/// Add a product to the cart.
///
/// The cart panel opens after the configured reveal delay.
///
/// # Errors
///
/// Returns `BadRequest` for a zero quantity and a JSON rejection for a
/// malformed body.
#[instrument(skip_all)]
pub async fn add(
    CurrentShopper(shopper): CurrentShopper,
    payload: std::result::Result<Json<AddToCartRequest>, JsonRejection>,
) -> Result<Json<CartView>> {
    let Json(request) = payload?;
    if request.quantity == 0 {
        return Err(AppError::BadRequest(
            "quantity must be at least 1".to_string(),
        ));
    }

    add_to_cart_with_notification(
        &shopper,
        &request.product,
        request.variant.as_ref(),
        request.quantity,
    );
    Ok(view(&shopper))
}

/// Set a line's quantity. Zero or less removes the line.
///
/// # Errors
///
/// Returns a JSON rejection for a malformed body.
#[instrument(skip_all, fields(line_id = %id))]
pub async fn update(
    CurrentShopper(shopper): CurrentShopper,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UpdateQuantityRequest>, JsonRejection>,
) -> Result<Json<CartView>> {
    let Json(request) = payload?;
    if !shopper.update_quantity(&id, request.quantity) {
        tracing::debug!("Quantity update for unknown line ignored");
    }
    Ok(view(&shopper))
}

/// Remove a line. Unknown ids leave the cart unchanged.
#[instrument(skip_all, fields(line_id = %id))]
pub async fn remove(
    CurrentShopper(shopper): CurrentShopper,
    Path(id): Path<String>,
) -> Json<CartView> {
    shopper.remove_from_cart(&id);
    view(&shopper)
}

/// Empty the cart.
#[instrument(skip_all)]
pub async fn clear(CurrentShopper(shopper): CurrentShopper) -> Json<CartView> {
    shopper.clear_cart();
    view(&shopper)
}

/// Open the cart panel.
#[instrument(skip_all)]
pub async fn open(CurrentShopper(shopper): CurrentShopper) -> Json<CartView> {
    shopper.open_cart();
    view(&shopper)
}

/// Close the cart panel.
#[instrument(skip_all)]
pub async fn close(CurrentShopper(shopper): CurrentShopper) -> Json<CartView> {
    shopper.close_cart();
    view(&shopper)
}

/// Flip the cart panel.
#[instrument(skip_all)]
pub async fn toggle(CurrentShopper(shopper): CurrentShopper) -> Json<CartView> {
    shopper.toggle_cart();
    view(&shopper)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::product;

    #[test]
    fn test_cart_view_totals() {
        let mut cart = Cart::default();
        assert!(cart.add(&product("p1", 12_500), None, 2).is_some());

        let view = CartView::from(&cart);
        assert_eq!(view.total_items, 2);
        assert_eq!(view.subtotal, Decimal::from(25_000));
        assert_eq!(view.subtotal_display, "25 000 FCFA");
        assert!(view.last_added_item.is_some());
        assert!(!view.is_open);
    }

    #[test]
    fn test_line_view_carries_discount() {
        let mut cart = Cart::default();
        let mut discounted = product("p1", 15_000);
        discounted.compare_at_price = Some(Decimal::from(20_000));
        assert!(cart.add(&discounted, None, 1).is_some());

        let json = serde_json::to_value(CartView::from(&cart)).unwrap();
        let line = &json["items"][0];
        assert_eq!(line["productId"], "p1");
        assert_eq!(line["discountPercentage"], 25);
        assert_eq!(line["priceDisplay"], "15 000 FCFA");
    }

    #[test]
    fn test_add_request_defaults_quantity() {
        let json = serde_json::json!({
            "product": {
                "id": "p1",
                "name": "Savon noir",
                "basePrice": 12500
            }
        });
        let request: AddToCartRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.quantity, 1);
        assert!(request.variant.is_none());
    }
}
