//! Store actions composed with a user-facing notification.

use marche_core::{CompareOutcome, LineItem, NotificationDraft, Product, Variant};

use crate::shopper::Shopper;

/// Add to the cart, then announce it.
///
/// Nothing is announced when `quantity` is zero.
pub fn add_to_cart_with_notification(
    shopper: &Shopper,
    product: &Product,
    variant: Option<&Variant>,
    quantity: u32,
) -> Option<LineItem> {
    let line = shopper.add_to_cart(product, variant, quantity)?;
    shopper.notifications().add(NotificationDraft::success(
        "Added to cart",
        format!("{} was added to your cart", product.name),
    ));
    Some(line)
}

/// Toggle wishlist membership, then announce what happened.
///
/// Membership is read before the toggle, inside the same critical section,
/// so the message always matches the change that was made. Returns whether
/// the product is saved afterwards.
pub fn toggle_wishlist_with_notification(
    shopper: &Shopper,
    product: &Product,
    variant: Option<&Variant>,
) -> bool {
    let was_saved = shopper.wishlist().update(|wishlist| {
        let was_saved = wishlist.contains(&product.id, variant.map(|v| &v.id));
        wishlist.toggle(product, variant);
        was_saved
    });

    let draft = if was_saved {
        NotificationDraft::info(
            "Removed from wishlist",
            format!("{} was removed from your wishlist", product.name),
        )
    } else {
        NotificationDraft::success(
            "Added to wishlist",
            format!("{} was added to your wishlist", product.name),
        )
    };
    shopper.notifications().add(draft);
    !was_saved
}

/// Toggle comparison membership, then announce the outcome.
///
/// A rejected add (duplicate or full) becomes a warning carrying the reason.
pub fn toggle_compare_with_notification(shopper: &Shopper, product: &Product) -> CompareOutcome {
    let outcome = shopper.toggle_compare(product);
    let draft = if outcome.success {
        NotificationDraft::success("Comparison updated", outcome.message.clone())
    } else {
        NotificationDraft::warning("Cannot compare", outcome.message.clone())
    };
    shopper.notifications().add(draft);
    outcome
}
