//! Per-shopper state container.
//!
//! A [`Shopper`] owns the four stores for one visitor: the persisted cart,
//! wishlist and compare slices, plus the transient notification center. It is
//! built explicitly (on first request, or by the CLI) and dropped on eviction;
//! dropping it cancels every timer it scheduled.
//!
//! Storage keys are namespaced per shopper: `{shopper_id}.cart-storage`.

use std::sync::Arc;
use std::time::Duration;

use marche_core::{
    CART_STORAGE_KEY, COMPARE_STORAGE_KEY, Cart, CheckoutSummary, CompareChange, CompareError,
    CompareList, CompareOutcome, DEFAULT_NOTIFICATION_DURATION_MS, LineItem, Product, ProductId,
    ShippingPolicy, ShopperId, Variant, VariantId, WISHLIST_STORAGE_KEY, Wishlist,
};
use parking_lot::Mutex;

use crate::notifications::NotificationCenter;
use crate::persist::{KeyValueStore, Persisted};
use crate::scheduler::ScheduledTask;

/// Behavior knobs shared by every shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopperSettings {
    /// Delay before the cart panel opens after an add; zero opens it immediately.
    pub cart_reveal_delay: Duration,
    /// Lifetime of notifications that do not set their own.
    pub notification_duration: Duration,
    /// Shipping fee policy for checkout summaries.
    pub shipping: ShippingPolicy,
}

impl Default for ShopperSettings {
    fn default() -> Self {
        Self {
            cart_reveal_delay: Duration::from_millis(300),
            notification_duration: Duration::from_millis(DEFAULT_NOTIFICATION_DURATION_MS),
            shipping: ShippingPolicy::default(),
        }
    }
}

/// Stores for a single shopper.
#[derive(Debug)]
pub struct Shopper {
    id: ShopperId,
    cart: Arc<Persisted<Cart>>,
    wishlist: Persisted<Wishlist>,
    compare: Persisted<CompareList>,
    notifications: NotificationCenter,
    cart_reveal: Mutex<Option<ScheduledTask>>,
    settings: ShopperSettings,
}

/// Storage key for one slice of one shopper's state.
#[must_use]
pub fn storage_key(id: ShopperId, slice: &str) -> String {
    format!("{id}.{slice}")
}

impl Shopper {
    /// Load a shopper's persisted slices from `store`.
    pub fn open(id: ShopperId, store: Arc<dyn KeyValueStore>, settings: ShopperSettings) -> Self {
        let cart = Persisted::load(Arc::clone(&store), storage_key(id, CART_STORAGE_KEY));
        let wishlist = Persisted::load(Arc::clone(&store), storage_key(id, WISHLIST_STORAGE_KEY));
        let compare = Persisted::load(store, storage_key(id, COMPARE_STORAGE_KEY));

        tracing::debug!(shopper_id = %id, "Shopper state loaded");

        Self {
            id,
            cart: Arc::new(cart),
            wishlist,
            compare,
            notifications: NotificationCenter::new(settings.notification_duration),
            cart_reveal: Mutex::new(None),
            settings,
        }
    }

    #[must_use]
    pub const fn id(&self) -> ShopperId {
        self.id
    }

    /// The persisted cart slice.
    #[must_use]
    pub fn cart(&self) -> &Persisted<Cart> {
        &self.cart
    }

    /// The persisted wishlist slice.
    #[must_use]
    pub const fn wishlist(&self) -> &Persisted<Wishlist> {
        &self.wishlist
    }

    /// The persisted compare slice.
    #[must_use]
    pub const fn compare(&self) -> &Persisted<CompareList> {
        &self.compare
    }

    #[must_use]
    pub const fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    #[must_use]
    pub const fn settings(&self) -> &ShopperSettings {
        &self.settings
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add to the cart and schedule the cart panel to open.
    ///
    /// Returns the affected line, or `None` when `quantity` is zero.
    pub fn add_to_cart(
        &self,
        product: &Product,
        variant: Option<&Variant>,
        quantity: u32,
    ) -> Option<LineItem> {
        let line = self
            .cart
            .update(|cart| cart.add(product, variant, quantity).cloned())?;

        tracing::info!(
            shopper_id = %self.id,
            line_id = %line.id,
            quantity = line.quantity,
            "Added to cart"
        );
        self.schedule_reveal();
        Some(line)
    }

    /// Set a line's quantity; zero or less removes it. Unknown ids are ignored.
    pub fn update_quantity(&self, id: &str, quantity: i64) -> bool {
        self.cart.update(|cart| cart.update_quantity(id, quantity))
    }

    pub fn remove_from_cart(&self, id: &str) -> bool {
        self.cart.update(|cart| cart.remove(id))
    }

    pub fn clear_cart(&self) {
        self.cart.update(Cart::clear);
    }

    pub fn open_cart(&self) {
        self.cart_reveal.lock().take();
        self.cart.update(Cart::open);
    }

    /// Close the panel, cancelling any pending reveal.
    pub fn close_cart(&self) {
        self.cart_reveal.lock().take();
        self.cart.update(Cart::close);
    }

    pub fn toggle_cart(&self) -> bool {
        self.cart_reveal.lock().take();
        self.cart.update(Cart::toggle)
    }

    #[must_use]
    pub fn is_in_cart(&self, product_id: &ProductId, variant_id: Option<&VariantId>) -> bool {
        self.cart.read(|cart| cart.is_in_cart(product_id, variant_id))
    }

    #[must_use]
    pub fn item_quantity(&self, product_id: &ProductId, variant_id: Option<&VariantId>) -> u32 {
        self.cart.read(|cart| cart.item_quantity(product_id, variant_id))
    }

    /// Totals for the current cart under the configured shipping policy.
    #[must_use]
    pub fn checkout_summary(&self) -> CheckoutSummary {
        self.cart
            .read(|cart| CheckoutSummary::from_cart(cart, &self.settings.shipping))
    }

    /// Whether a cart reveal is still waiting to fire.
    #[must_use]
    pub fn reveal_pending(&self) -> bool {
        self.cart_reveal
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    fn schedule_reveal(&self) {
        let delay = self.settings.cart_reveal_delay;
        if delay.is_zero() {
            self.cart.update(Cart::open);
            return;
        }

        let cart = Arc::downgrade(&self.cart);
        let task = ScheduledTask::after(delay, move || {
            if let Some(cart) = cart.upgrade() {
                cart.update(Cart::open);
            }
        });
        // Replacing the handle cancels an older pending reveal.
        *self.cart_reveal.lock() = Some(task);
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// Save a product. Returns `false` if it was already saved.
    pub fn add_to_wishlist(&self, product: &Product, variant: Option<&Variant>) -> bool {
        self.wishlist.update(|wishlist| wishlist.add(product, variant))
    }

    pub fn remove_from_wishlist(&self, id: &str) -> bool {
        self.wishlist.update(|wishlist| wishlist.remove(id))
    }

    #[must_use]
    pub fn is_in_wishlist(&self, product_id: &ProductId, variant_id: Option<&VariantId>) -> bool {
        self.wishlist
            .read(|wishlist| wishlist.contains(product_id, variant_id))
    }

    /// Toggle membership. Returns whether the product is saved afterwards.
    pub fn toggle_wishlist(&self, product: &Product, variant: Option<&Variant>) -> bool {
        self.wishlist
            .update(|wishlist| wishlist.toggle(product, variant))
    }

    pub fn clear_wishlist(&self) {
        self.wishlist.update(Wishlist::clear);
    }

    // =========================================================================
    // Compare
    // =========================================================================

    /// Add a product to the comparison.
    ///
    /// # Errors
    ///
    /// Returns `CompareError` if the product is already compared or the set is full.
    pub fn add_to_compare(&self, product: &Product) -> Result<CompareChange, CompareError> {
        self.compare.update(|compare| compare.add(product))
    }

    pub fn remove_from_compare(&self, product_id: &ProductId) -> bool {
        self.compare
            .update(|compare| compare.remove(product_id).is_some())
    }

    pub fn clear_compare(&self) {
        self.compare.update(CompareList::clear);
    }

    #[must_use]
    pub fn is_in_compare(&self, product_id: &ProductId) -> bool {
        self.compare.read(|compare| compare.contains(product_id))
    }

    /// Add or remove a product; both branches report `{success, message}`.
    pub fn toggle_compare(&self, product: &Product) -> CompareOutcome {
        self.compare
            .update(|compare| CompareOutcome::from(compare.toggle(product)))
    }
}
