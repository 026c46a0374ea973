//! Coupon codes.
//!
//! A coupon resolves to a percentage off the cart subtotal. Unknown codes are
//! not errors: they resolve to [`CouponStatus::Invalid`] so the UI can show a
//! message while the discount stays zero.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// The code recognized out of the box.
pub const DEFAULT_COUPON_CODE: &str = "DISCOUNT20";

/// Percentage off granted by [`DEFAULT_COUPON_CODE`].
pub const DEFAULT_COUPON_PERCENT: f64 = 20.0;

/// A recognized coupon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coupon {
    /// Coupon code, matched case-insensitively.
    pub code: String,
    /// Percentage off the subtotal (0.0 - 100.0).
    pub percent: f64,
}

impl Coupon {
    pub fn new(code: impl Into<String>, percent: f64) -> Self {
        Self {
            code: code.into(),
            percent,
        }
    }

    /// Discount as a fraction in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        (self.percent / 100.0).clamp(0.0, 1.0)
    }

    fn matches(&self, code: &str) -> bool {
        self.code.eq_ignore_ascii_case(code)
    }
}

/// The set of recognized coupons.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CouponTable {
    coupons: Vec<Coupon>,
}

impl CouponTable {
    pub fn new(coupons: Vec<Coupon>) -> Self {
        Self { coupons }
    }

    /// A table that recognizes nothing.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn coupons(&self) -> &[Coupon] {
        &self.coupons
    }

    /// Resolve a code entered by the shopper.
    ///
    /// `None` and blank codes mean no coupon was entered.
    pub fn resolve(&self, code: Option<&str>) -> CouponStatus {
        let code = match code.map(str::trim) {
            Some(c) if !c.is_empty() => c,
            _ => return CouponStatus::NotApplied,
        };
        match self.coupons.iter().find(|c| c.matches(code)) {
            Some(coupon) => CouponStatus::Applied {
                code: coupon.code.clone(),
                percent: coupon.percent,
            },
            None => CouponStatus::Invalid {
                code: code.to_string(),
            },
        }
    }
}

impl Default for CouponTable {
    fn default() -> Self {
        Self::new(vec![Coupon::new(DEFAULT_COUPON_CODE, DEFAULT_COUPON_PERCENT)])
    }
}

/// Outcome of resolving a coupon code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub enum CouponStatus {
    /// No code was entered.
    #[default]
    NotApplied,
    /// The code was recognized.
    Applied { code: String, percent: f64 },
    /// The code was entered but is not recognized.
    Invalid { code: String },
}

impl CouponStatus {
    /// Whether a recognized coupon applies.
    pub fn is_valid(&self) -> bool {
        matches!(self, CouponStatus::Applied { .. })
    }

    /// Whether the shopper should be told the code is wrong.
    pub fn is_invalid(&self) -> bool {
        matches!(self, CouponStatus::Invalid { .. })
    }

    /// Discount fraction in `[0, 1]`; zero unless applied.
    pub fn discount_fraction(&self) -> f64 {
        match self {
            CouponStatus::Applied { percent, .. } => (percent / 100.0).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    /// Discount on a subtotal, never more than the subtotal.
    pub fn discount_on(&self, subtotal: &Money) -> Money {
        let discount = subtotal.multiply_decimal(self.discount_fraction());
        if discount.amount_cents > subtotal.amount_cents {
            *subtotal
        } else {
            discount.floor_zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_default_code_resolves() {
        let table = CouponTable::default();
        let status = table.resolve(Some("DISCOUNT20"));
        assert!(status.is_valid());
        assert!((status.discount_fraction() - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_code_matching_ignores_case_and_whitespace() {
        let table = CouponTable::default();
        assert!(table.resolve(Some("  discount20 ")).is_valid());
    }

    #[test]
    fn test_unknown_code_is_invalid_not_error() {
        let status = CouponTable::default().resolve(Some("FOO"));
        assert!(status.is_invalid());
        assert_eq!(status.discount_fraction(), 0.0);
        let subtotal = Money::new(15000, Currency::USD);
        assert!(status.discount_on(&subtotal).is_zero());
    }

    #[test]
    fn test_blank_code_is_not_applied() {
        let table = CouponTable::default();
        assert_eq!(table.resolve(None), CouponStatus::NotApplied);
        assert_eq!(table.resolve(Some("   ")), CouponStatus::NotApplied);
    }

    #[test]
    fn test_discount_capped_at_subtotal() {
        let status = CouponTable::new(vec![Coupon::new("ALL", 150.0)]).resolve(Some("all"));
        let subtotal = Money::new(5000, Currency::USD);
        assert_eq!(status.discount_on(&subtotal), subtotal);
    }
}
