//! Newtype wrappers for storefront domain values.

pub mod email;
pub mod id;
pub mod price;

pub use email::{Email, EmailError};
pub use id::ProductId;
pub use price::{Price, SHIPPING_FEE};
