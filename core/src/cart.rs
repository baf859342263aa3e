//! Shopping cart reducer.

use serde::Serialize;

use emporium_receipt::InvoiceLine;
use emporium_types::{Gold, Product};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub product: Product,
    /// Always at least 1.
    pub quantity: u64,
}

impl CartLine {
    #[must_use]
    pub fn line_total(&self) -> Gold {
        self.product.price.saturating_mul(self.quantity)
    }
}

/// Ordered cart lines, one per distinct product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit. An existing line for the same product id is incremented.
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self.line_mut(&product.id) {
            line.quantity = line.quantity.saturating_add(1);
            return;
        }
        self.lines.push(CartLine {
            product: product.clone(),
            quantity: 1,
        });
    }

    /// Add `quantity` units at once; zero is a no-op.
    pub fn add_many(&mut self, product: &Product, quantity: u64) {
        if quantity == 0 {
            return;
        }
        self.add(product);
        self.update_quantity(&product.id, i64::try_from(quantity - 1).unwrap_or(i64::MAX));
    }

    /// Returns `false` when no line had that id.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product.id != product_id);
        self.lines.len() != before
    }

    /// Shift a line's quantity by `delta`, never dropping below 1.
    pub fn update_quantity(&mut self, product_id: &str, delta: i64) {
        if let Some(line) = self.line_mut(product_id) {
            let updated = if delta.is_negative() {
                line.quantity.saturating_sub(delta.unsigned_abs())
            } else {
                line.quantity.saturating_add(delta.unsigned_abs())
            };
            line.quantity = updated.max(1);
        }
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn total(&self) -> Gold {
        self.lines
            .iter()
            .fold(Gold::ZERO, |acc, line| acc.saturating_add(line.line_total()))
    }

    /// Units across all lines (the badge count on the cart icon).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[must_use]
    pub fn invoice_lines(&self) -> Vec<InvoiceLine> {
        self.lines
            .iter()
            .map(|line| InvoiceLine {
                name: line.product.name.clone(),
                quantity: line.quantity,
                unit_price: line.product.price,
            })
            .collect()
    }

    fn line_mut(&mut self, product_id: &str) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product.id == product_id)
    }
}
