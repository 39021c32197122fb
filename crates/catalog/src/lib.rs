//! Catalog domain module: stores (tenants) and their coupons.
//!
//! Pure domain logic (no IO, no HTTP, no storage).

pub mod coupon;
pub mod store;

pub use coupon::{Coupon, CouponDraft, DISCOUNT_RANGE, NewCoupon};
pub use store::Store;
