//! Core domain logic for Emporium.
//!
//! Cart reducer, budget checkout, storefront switching and theme variables.
//! Everything here is synchronous and free of IO; persistence lives in
//! `emporium-store`.

mod cart;
mod checkout;
mod storefront;
mod theme;

pub use cart::{Cart, CartLine};
pub use checkout::{Checkout, CheckoutError};
pub use storefront::{LaunchParams, StoreDirectory, View, share_url};
pub use theme::{theme_stylesheet, theme_variables};
