//! Checkout summary route.

use axum::Json;
use marche_core::{CheckoutSummary, format_fcfa};
use serde::Serialize;
use tracing::instrument;

use crate::middleware::CurrentShopper;

/// Checkout totals with preformatted amounts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    #[serde(flatten)]
    pub summary: CheckoutSummary,
    pub subtotal_display: String,
    pub savings_display: String,
    pub shipping_display: String,
    pub total_display: String,
}

impl From<CheckoutSummary> for CheckoutView {
    fn from(summary: CheckoutSummary) -> Self {
        Self {
            subtotal_display: format_fcfa(summary.subtotal),
            savings_display: format_fcfa(summary.savings),
            shipping_display: if summary.free_shipping {
                "Free".to_string()
            } else {
                format_fcfa(summary.shipping)
            },
            total_display: format_fcfa(summary.total),
            summary,
        }
    }
}

/// Order totals for the current cart.
#[instrument(skip_all)]
pub async fn summary(CurrentShopper(shopper): CurrentShopper) -> Json<CheckoutView> {
    Json(shopper.checkout_summary().into())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn summary(subtotal: i64, shipping: i64) -> CheckoutSummary {
        CheckoutSummary {
            item_count: 1,
            subtotal: Decimal::from(subtotal),
            savings: Decimal::ZERO,
            shipping: Decimal::from(shipping),
            total: Decimal::from(subtotal + shipping),
            free_shipping: shipping == 0,
        }
    }

    #[test]
    fn test_paid_shipping_display() {
        let view = CheckoutView::from(summary(20_000, 3_275));
        assert_eq!(view.shipping_display, "3 275 FCFA");
        assert_eq!(view.total_display, "23 275 FCFA");
    }

    #[test]
    fn test_free_shipping_display() {
        let view = CheckoutView::from(summary(60_000, 0));
        assert_eq!(view.shipping_display, "Free");

        let json = serde_json::to_value(&view).unwrap_or_default();
        assert_eq!(json["freeShipping"], true);
        assert_eq!(json["itemCount"], 1);
    }
}
