//! Product comparison commands.
//!
//! A refused add (duplicate or full list) fails the command with the reason.

use marche_core::{CompareOutcome, Product, ProductId};
use marche_storefront::actions::toggle_compare_with_notification;
use marche_storefront::routes::compare::CompareView;
use marche_storefront::shopper::Shopper;
use serde_json::Value;

use super::{CliError, log_notifications, to_output};

fn view(shopper: &Shopper) -> Result<Value, CliError> {
    to_output(&shopper.compare().read(|list| CompareView::from(list)))
}

fn accept(outcome: CompareOutcome) -> Result<(), CliError> {
    if outcome.success {
        tracing::info!("{}", outcome.message);
        Ok(())
    } else {
        Err(CliError::Refused(outcome.message))
    }
}

/// Show compared products.
///
/// # Errors
///
/// Returns `CliError::Output` if the list cannot be encoded.
pub fn show(shopper: &Shopper) -> Result<Value, CliError> {
    view(shopper)
}

/// Add a product to the comparison.
///
/// # Errors
///
/// Returns `CliError::Refused` if the product is already compared or the
/// list is full.
pub fn add(shopper: &Shopper, product: &Product) -> Result<Value, CliError> {
    accept(CompareOutcome::from(shopper.add_to_compare(product)))?;
    view(shopper)
}

/// Add a product, or remove it if already compared.
///
/// # Errors
///
/// Returns `CliError::Refused` if the list is full.
pub fn toggle(shopper: &Shopper, product: &Product) -> Result<Value, CliError> {
    let outcome = toggle_compare_with_notification(shopper, product);
    log_notifications(shopper);
    accept(outcome)?;
    view(shopper)
}

/// Remove a product.
///
/// # Errors
///
/// Returns `CliError::Output` if the list cannot be encoded.
pub fn remove(shopper: &Shopper, product_id: &str) -> Result<Value, CliError> {
    if !shopper.remove_from_compare(&ProductId::new(product_id)) {
        tracing::warn!(product_id = %product_id, "Not in comparison");
    }
    view(shopper)
}

/// Remove every product.
///
/// # Errors
///
/// Returns `CliError::Output` if the list cannot be encoded.
pub fn clear(shopper: &Shopper) -> Result<Value, CliError> {
    shopper.clear_compare();
    view(shopper)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::test_support::{product, shopper};

    #[tokio::test]
    async fn test_fifth_product_is_refused() {
        let shopper = shopper();
        for id in ["a", "b", "c", "d"] {
            add(&shopper, &product(id, 1_000)).unwrap();
        }

        let err = add(&shopper, &product("e", 1_000)).unwrap_err();
        assert!(matches!(err, CliError::Refused(ref msg) if msg.contains('4')));
        assert_eq!(show(&shopper).unwrap()["items"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_duplicate_is_refused() {
        let shopper = shopper();
        add(&shopper, &product("a", 1_000)).unwrap();
        assert!(matches!(
            add(&shopper, &product("a", 1_000)),
            Err(CliError::Refused(_))
        ));
    }

    #[tokio::test]
    async fn test_toggle_removes_compared_product() {
        let shopper = shopper();
        let p = product("a", 1_000);
        toggle(&shopper, &p).unwrap();
        let out = toggle(&shopper, &p).unwrap();
        assert!(out["items"].as_array().unwrap().is_empty());
        assert_eq!(out["maxItems"], 4);
    }
}
