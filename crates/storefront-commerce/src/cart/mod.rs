//! Shopping cart module.
//!
//! Contains the cart, coupons, pricing, and the cart store.

mod cart;
mod coupon;
mod pricing;
mod store;

pub use cart::{Cart, CartLine, MAX_QUANTITY_PER_ITEM};
pub use coupon::{Coupon, CouponStatus, CouponTable, DEFAULT_COUPON_CODE, DEFAULT_COUPON_PERCENT};
pub use pricing::{CartSummary, LineSummary, PricingEngine, PricingRules};
pub use store::CartStore;
