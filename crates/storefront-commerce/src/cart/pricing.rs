//! Cart pricing calculations.
//!
//! Pure functions over a [`Cart`]: line subtotals, coupon discount, the flat
//! shipping rule and the grand total.

use crate::cart::{Cart, CartLine, CouponStatus, CouponTable};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Thresholds and tables the pricing engine applies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingRules {
    /// Currency every amount is expressed in.
    pub currency: Currency,
    /// Subtotal at or above which shipping is free.
    pub free_shipping_threshold: Money,
    /// Shipping charged below the threshold.
    pub flat_shipping: Money,
    /// Recognized coupon codes.
    pub coupons: CouponTable,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            currency: Currency::USD,
            free_shipping_threshold: Money::units(100, Currency::USD),
            flat_shipping: Money::units(10, Currency::USD),
            coupons: CouponTable::default(),
        }
    }
}

/// Complete pricing breakdown for a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartSummary {
    /// Sum of line subtotals.
    pub subtotal: Money,
    /// Coupon discount.
    pub discount: Money,
    /// Shipping cost.
    pub shipping: Money,
    /// Final total (subtotal - discount + shipping), never negative.
    pub total: Money,
    /// How the entered coupon resolved.
    pub coupon: CouponStatus,
    /// Per-line breakdown in cart order.
    pub lines: Vec<LineSummary>,
}

impl CartSummary {
    /// Check if a discount is applied.
    pub fn has_discount(&self) -> bool {
        self.discount.is_positive()
    }

    /// Get discount percentage of subtotal.
    pub fn discount_percentage(&self) -> f64 {
        if self.subtotal.amount_cents == 0 {
            return 0.0;
        }
        (self.discount.amount_cents as f64 / self.subtotal.amount_cents as f64) * 100.0
    }

    /// Check if shipping is free.
    pub fn has_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

/// Pricing breakdown for a single line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineSummary {
    /// Product on this line.
    pub product_id: ProductId,
    /// Effective unit price.
    pub unit_price: Money,
    /// Quantity.
    pub quantity: i64,
    /// Subtotal (unit_price * quantity).
    pub subtotal: Money,
}

/// Stateless pricing over a set of rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingEngine {
    rules: PricingRules,
}

impl PricingEngine {
    pub fn new(rules: PricingRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &PricingRules {
        &self.rules
    }

    /// Resolve a coupon code against the rules' coupon table.
    pub fn resolve_coupon(&self, code: Option<&str>) -> CouponStatus {
        self.rules.coupons.resolve(code)
    }

    /// `quantity × effective price`.
    pub fn line_subtotal(&self, line: &CartLine) -> Result<Money, CommerceError> {
        if line.quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(line.quantity));
        }
        line.product
            .effective_price()
            .try_multiply(line.quantity)
            .ok_or(CommerceError::Overflow)
    }

    /// Shipping for a subtotal: free at or above the threshold, flat below it.
    pub fn shipping_for(&self, subtotal: &Money) -> Money {
        if subtotal.amount_cents >= self.rules.free_shipping_threshold.amount_cents {
            Money::zero(self.rules.currency)
        } else {
            self.rules.flat_shipping
        }
    }

    /// Amount still needed to reach free shipping.
    pub fn remaining_for_free_shipping(&self, subtotal: &Money) -> Money {
        let remaining = self.rules.free_shipping_threshold.amount_cents - subtotal.amount_cents;
        Money::new(remaining.max(0), self.rules.currency)
    }

    /// Subtotal, coupon discount, shipping and total for a cart.
    pub fn summarize(&self, cart: &Cart, coupon_code: Option<&str>) -> Result<CartSummary, CommerceError> {
        let currency = self.rules.currency;
        if cart.currency() != currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: currency.code().to_string(),
                got: cart.currency().code().to_string(),
            });
        }

        let lines = cart
            .lines()
            .iter()
            .map(|line| {
                Ok(LineSummary {
                    product_id: line.product.id.clone(),
                    unit_price: line.product.effective_price(),
                    quantity: line.quantity,
                    subtotal: self.line_subtotal(line)?,
                })
            })
            .collect::<Result<Vec<_>, CommerceError>>()?;

        let subtotal =
            Money::try_sum(lines.iter().map(|l| &l.subtotal), currency).ok_or(CommerceError::Overflow)?;

        let coupon = self.resolve_coupon(coupon_code);
        let discount = coupon.discount_on(&subtotal);
        let shipping = self.shipping_for(&subtotal);

        let total = subtotal
            .try_subtract(&discount)
            .and_then(|m| m.try_add(&shipping))
            .ok_or(CommerceError::Overflow)?
            .floor_zero();

        Ok(CartSummary {
            subtotal,
            discount,
            shipping,
            total,
            coupon,
            lines,
        })
    }
}
