//! Cart store: owns the cart and notifies subscribers on every change.

use crate::cart::{Cart, CartSummary, PricingEngine};
use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::observe::{Subscribers, Subscription};
use std::sync::Arc;
use tracing::{debug, warn};

/// The single owner of the shopper's cart.
///
/// Construct one per session and pass it by reference to whatever renders or
/// mutates the cart. Listeners receive the cart after each change.
#[derive(Debug, Default)]
pub struct CartStore {
    cart: Cart,
    pricing: PricingEngine,
    subscribers: Subscribers<Cart>,
}

impl CartStore {
    pub fn new(pricing: PricingEngine) -> Self {
        Self {
            cart: Cart::new(pricing.rules().currency),
            pricing,
            subscribers: Subscribers::new(),
        }
    }

    /// Read-only view of the cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn pricing(&self) -> &PricingEngine {
        &self.pricing
    }

    /// Add one unit of a product.
    pub fn add_one(&mut self, product: Arc<Product>) -> Result<(), CommerceError> {
        self.add_item(product, 1)
    }

    /// Add `quantity` units, accumulating onto an existing line.
    ///
    /// A rejected add leaves the cart untouched and notifies nobody.
    pub fn add_item(&mut self, product: Arc<Product>, quantity: i64) -> Result<(), CommerceError> {
        let product_id = product.id.clone();
        match self.cart.add_item(product, quantity) {
            Ok(()) => {
                debug!(product = %product_id, quantity, "added to cart");
                self.notify();
                Ok(())
            }
            Err(e) => {
                warn!(product = %product_id, quantity, error = %e, "rejected cart add");
                Err(e)
            }
        }
    }

    /// Remove a product's line. Returns whether it was present.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let removed = self.cart.remove_item(product_id);
        if removed {
            debug!(product = %product_id, "removed from cart");
            self.notify();
        }
        removed
    }

    /// Set a line's quantity; zero or less removes the line.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<bool, CommerceError> {
        let changed = self.cart.update_quantity(product_id, quantity).map_err(|e| {
            warn!(product = %product_id, quantity, error = %e, "rejected quantity update");
            e
        })?;
        if changed {
            debug!(product = %product_id, quantity, "updated cart quantity");
            self.notify();
        }
        Ok(changed)
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        if self.cart.is_empty() {
            return;
        }
        self.cart.clear();
        debug!("cleared cart");
        self.notify();
    }

    /// Sum of quantities.
    pub fn total_items(&self) -> i64 {
        self.cart.total_items()
    }

    /// Totals for the current cart and an optional coupon code.
    pub fn summary(&self, coupon_code: Option<&str>) -> Result<CartSummary, CommerceError> {
        self.pricing.summarize(&self.cart, coupon_code)
    }

    pub fn subscribe(&mut self, listener: impl Fn(&Cart) + 'static) -> Subscription {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.subscribers.unsubscribe(subscription)
    }

    fn notify(&self) {
        self.subscribers.notify(&self.cart);
    }
}
