//! Infrastructure layer: tenant lookup, coupon persistence, pagination.

pub mod coupon_repository;
pub mod pagination;
pub mod seed;
pub mod store_directory;

pub use coupon_repository::{CouponRepository, InMemoryCouponRepository};
pub use pagination::{DEFAULT_PER_PAGE, MAX_PER_PAGE, Page, PageMeta, PageRequest};
pub use store_directory::{InMemoryStoreDirectory, StoreDirectory};
