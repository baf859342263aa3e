//! Checkout against a customer-declared budget.
//!
//! No payment happens: the customer states how much gold they carry, and the
//! purchase goes through when that covers the cart total.

use rand::Rng;
use thiserror::Error;

use emporium_receipt::Invoice;
use emporium_types::{CustomerDetails, Gold};

use crate::cart::Cart;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,
    #[error("customer name is required")]
    MissingCustomerName,
    #[error("insufficient funds: total is {total}, budget is {budget}")]
    InsufficientFunds { total: Gold, budget: Gold },
}

#[derive(Debug, Clone)]
pub struct Checkout {
    customer: CustomerDetails,
    budget: Gold,
}

impl Checkout {
    #[must_use]
    pub fn new(customer: CustomerDetails, budget: Gold) -> Self {
        Self { customer, budget }
    }

    #[must_use]
    pub fn customer(&self) -> &CustomerDetails {
        &self.customer
    }

    #[must_use]
    pub fn budget(&self) -> Gold {
        self.budget
    }

    /// The checks `complete` performs, without issuing an invoice.
    pub fn validate(&self, cart: &Cart) -> Result<(), CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if self.customer.name.trim().is_empty() {
            return Err(CheckoutError::MissingCustomerName);
        }
        let total = cart.total();
        if self.budget < total {
            return Err(CheckoutError::InsufficientFunds {
                total,
                budget: self.budget,
            });
        }
        Ok(())
    }

    pub fn complete(&self, store_name: &str, cart: &Cart) -> Result<Invoice, CheckoutError> {
        self.complete_with(store_name, cart, &mut rand::rng())
    }

    pub fn complete_with<R: Rng>(
        &self,
        store_name: &str,
        cart: &Cart,
        rng: &mut R,
    ) -> Result<Invoice, CheckoutError> {
        if let Err(err) = self.validate(cart) {
            tracing::info!(%err, "checkout refused");
            return Err(err);
        }
        Ok(Invoice::issue_with(
            store_name,
            self.customer.clone(),
            cart.invoice_lines(),
            self.budget,
            rng,
        ))
    }
}
