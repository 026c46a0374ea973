//! Cart and cart line types.

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Currency;
use std::sync::Arc;

/// Maximum quantity allowed per line.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// One product in the cart together with its quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    /// The product, shared with the catalog.
    pub product: Arc<Product>,
    /// Quantity, always at least 1.
    pub quantity: i64,
}

impl CartLine {
    pub fn product_id(&self) -> &ProductId {
        &self.product.id
    }
}

/// A shopping cart.
///
/// Lines keep insertion order. No line ever holds a quantity below 1: lines
/// that would drop to zero are removed instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
    currency: Currency,
}

impl Cart {
    /// Create an empty cart in the given currency.
    pub fn new(currency: Currency) -> Self {
        Self {
            lines: Vec::new(),
            currency,
        }
    }

    /// Add a product to the cart.
    ///
    /// Adding a product already in the cart accumulates its quantity.
    /// Returns an error if:
    /// - Quantity is not positive
    /// - The product has no positive price or uses another currency
    /// - Adding would exceed MAX_QUANTITY_PER_ITEM
    pub fn add_item(&mut self, product: Arc<Product>, quantity: i64) -> Result<(), CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        self.check_product(&product)?;

        if let Some(existing) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
            let new_quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;

            if new_quantity > MAX_QUANTITY_PER_ITEM {
                return Err(CommerceError::QuantityExceedsLimit(
                    new_quantity,
                    MAX_QUANTITY_PER_ITEM,
                ));
            }

            existing.quantity = new_quantity;
            return Ok(());
        }

        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        self.lines.push(CartLine { product, quantity });
        Ok(())
    }

    /// Set a line's quantity.
    ///
    /// If quantity is <= 0, removes the line. Returns whether the cart changed.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Ok(self.remove_item(product_id));
        }

        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        match self.lines.iter_mut().find(|l| &l.product.id == product_id) {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Remove a line from the cart.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.lines.len();
        self.lines.retain(|l| &l.product.id != product_id);
        self.lines.len() < len_before
    }

    /// Clear all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Get total item count (sum of quantities).
    pub fn total_items(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Get number of distinct products.
    pub fn unique_item_count(&self) -> usize {
        self.lines.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get a line by product ID.
    pub fn get_line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product.id == product_id)
    }

    /// Quantity of a product, zero when absent.
    pub fn quantity_of(&self, product_id: &ProductId) -> i64 {
        self.get_line(product_id).map(|l| l.quantity).unwrap_or(0)
    }

    fn check_product(&self, product: &Product) -> Result<(), CommerceError> {
        if product.price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: product.price.currency.code().to_string(),
            });
        }
        if !product.price.is_positive() || product.effective_price().is_negative() {
            return Err(CommerceError::InvalidProduct(format!(
                "{}: price must be positive",
                product.id
            )));
        }
        Ok(())
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}
