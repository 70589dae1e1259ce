//! # Cart
//!
//! The in-memory cart a sale is assembled from.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  UI Action                 Cart Change                              │
//! │  ─────────                 ───────────                              │
//! │  Pick product        ────► add_line (merges same product)           │
//! │  Change quantity     ────► update_quantity (0 removes)              │
//! │  Remove row          ────► remove_line                              │
//! │  Confirm sale        ────► lines handed to SaleService, cart        │
//! │                            cleared by the caller on success         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lines freeze the product's unit price when added; a later product
//! price edit does not reprice a cart already on screen.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ValidationError};
use crate::money::Money;
use crate::types::Product;
use crate::validation::validate_quantity;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

/// A line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Product reference (for stock check and persistence).
    pub product_id: i64,

    /// Product name at time of adding (frozen, display only).
    pub name: String,

    /// Unit price in cents at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Quantity in the cart.
    pub quantity: i64,
}

impl CartLine {
    /// Creates a cart line from a product and quantity, freezing the
    /// current price.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartLine {
            product_id: product.id,
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity,
        }
    }

    /// Line subtotal: quantity × frozen unit price.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.unit_price_cents).multiply_quantity(self.quantity)
    }
}

/// The cart a sale is assembled from.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product again
///   increases quantity)
/// - Every quantity is > 0
/// - At most [`MAX_CART_LINES`] lines
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds a product, or increases the quantity of its existing line.
    pub fn add_line(&mut self, product: &Product, quantity: i64) -> Result<(), CoreError> {
        validate_quantity(quantity)?;

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.id)
        {
            let new_qty = line.quantity + quantity;
            if new_qty > MAX_LINE_QUANTITY {
                return Err(ValidationError::OutOfRange {
                    field: "quantity".to_string(),
                    min: 1,
                    max: MAX_LINE_QUANTITY,
                }
                .into());
            }
            line.quantity = new_qty;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        self.lines.push(CartLine::from_product(product, quantity));
        Ok(())
    }

    /// Sets the quantity of a product's line. Zero removes the line.
    pub fn update_quantity(&mut self, product_id: i64, quantity: i64) -> Result<(), CoreError> {
        if quantity == 0 {
            self.remove_line(product_id);
            return Ok(());
        }
        validate_quantity(quantity)?;

        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::ProductNotFound(product_id)),
        }
    }

    /// Removes a product's line, if present.
    pub fn remove_line(&mut self, product_id: i64) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Removes all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of line subtotals.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str, price_cents: i64) -> Product {
        Product {
            id,
            name: name.to_string(),
            price_cents,
            stock: 100,
            category_id: None,
        }
    }

    #[test]
    fn test_add_and_total() {
        let mut cart = Cart::new();
        cart.add_line(&product(1, "Pen", 1000), 2).unwrap();
        cart.add_line(&product(2, "Pad", 500), 3).unwrap();

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total().cents(), 3500);
    }

    #[test]
    fn test_add_same_product_merges() {
        let mut cart = Cart::new();
        let pen = product(1, "Pen", 1000);
        cart.add_line(&pen, 2).unwrap();
        cart.add_line(&pen, 1).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines[0].quantity, 3);
    }

    #[test]
    fn test_price_is_frozen_at_add_time() {
        let mut cart = Cart::new();
        let mut pen = product(1, "Pen", 1000);
        cart.add_line(&pen, 1).unwrap();

        pen.price_cents = 9999;
        assert_eq!(cart.total().cents(), 1000);
    }

    #[test]
    fn test_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        assert!(cart.add_line(&product(1, "Pen", 1000), 0).is_err());
        assert!(cart.add_line(&product(1, "Pen", 1000), -2).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new();
        cart.add_line(&product(1, "Pen", 1000), 2).unwrap();

        cart.update_quantity(1, 5).unwrap();
        assert_eq!(cart.lines[0].quantity, 5);

        cart.update_quantity(1, 0).unwrap();
        assert!(cart.is_empty());

        assert!(matches!(
            cart.update_quantity(99, 1),
            Err(CoreError::ProductNotFound(99))
        ));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        cart.add_line(&product(1, "Pen", 1000), 1).unwrap();
        cart.add_line(&product(2, "Pad", 500), 1).unwrap();

        cart.remove_line(1);
        assert_eq!(cart.len(), 1);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total().cents(), 0);
    }
}
