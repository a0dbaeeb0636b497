//! Customer cart built on the public storefront page and turned into order
//! line items at checkout.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::models::{MAX_LINE_QUANTITY, OrderItem, Product};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("quantity for product {product_id} exceeds the per-line limit")]
    QuantityLimit { product_id: i32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub product_id: i32,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds one unit of `product`.
    pub fn add(&mut self, product: &Product) -> Result<(), CartError> {
        self.add_quantity(product, 1)
    }

    /// Adds `quantity` units, merging with an existing line for the same
    /// product. The line keeps the name and price it was first added with.
    /// A line never holds more than [`MAX_LINE_QUANTITY`] units; on error
    /// the cart is left unchanged.
    pub fn add_quantity(&mut self, product: &Product, quantity: i32) -> Result<(), CartError> {
        if quantity <= 0 {
            return Ok(());
        }
        let limit = CartError::QuantityLimit {
            product_id: product.id,
        };
        match self.items.iter_mut().find(|i| i.product_id == product.id) {
            Some(item) => {
                item.quantity = item
                    .quantity
                    .checked_add(quantity)
                    .filter(|q| *q <= MAX_LINE_QUANTITY)
                    .ok_or(limit)?;
            }
            None if quantity > MAX_LINE_QUANTITY => return Err(limit),
            None => self.items.push(CartItem {
                product_id: product.id,
                name: product.name.clone(),
                price: product.price,
                quantity,
            }),
        }
        Ok(())
    }

    pub fn remove(&mut self, product_id: i32) {
        self.items.retain(|i| i.product_id != product_id);
    }

    /// A quantity of zero or less drops the line.
    pub fn set_quantity(&mut self, product_id: i32, quantity: i32) -> Result<(), CartError> {
        if quantity <= 0 {
            self.remove(product_id);
            return Ok(());
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(CartError::QuantityLimit { product_id });
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = quantity;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(|i| i.price * Decimal::from(i.quantity))
            .sum()
    }

    pub fn total_items(&self) -> i32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn into_order_items(self) -> Vec<OrderItem> {
        self.items
            .into_iter()
            .map(|i| OrderItem {
                product_id: i.product_id,
                name: i.name,
                price: i.price,
                quantity: i.quantity,
            })
            .collect()
    }
}

/// Sum of line subtotals; the only valid `total` for an order.
pub fn order_total(items: &[OrderItem]) -> Decimal {
    items.iter().map(OrderItem::subtotal).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i32, name: &str, cents: i64) -> Product {
        Product {
            id,
            store_id: 1,
            category_id: None,
            name: name.into(),
            description: None,
            price: Decimal::new(cents, 2),
            image_url: None,
            is_active: true,
            sort_order: 0,
        }
    }

    #[test]
    fn adding_same_product_increments_quantity() {
        let cola = product(1, "Cola", 500);
        let mut cart = Cart::new();
        cart.add(&cola).unwrap();
        cart.add(&cola).unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.total(), Decimal::new(1000, 2));
    }

    #[test]
    fn set_quantity_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add(&product(1, "Cola", 500)).unwrap();
        cart.add(&product(2, "Chips", 350)).unwrap();
        cart.set_quantity(1, 0).unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].product_id, 2);
    }

    #[test]
    fn totals_span_all_lines() {
        let mut cart = Cart::new();
        cart.add_quantity(&product(1, "Cola", 500), 3).unwrap();
        cart.add_quantity(&product(2, "Chips", 350), 2).unwrap();

        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.total().to_string(), "22.00");

        let items = cart.into_order_items();
        assert_eq!(order_total(&items).to_string(), "22.00");
    }

    #[test]
    fn non_positive_add_is_ignored() {
        let mut cart = Cart::new();
        cart.add_quantity(&product(1, "Cola", 500), 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn merged_quantity_cannot_overflow() {
        let cola = product(1, "Cola", 500);
        let mut cart = Cart::new();
        cart.add_quantity(&cola, 2).unwrap();

        let err = cart.add_quantity(&cola, i32::MAX).unwrap_err();
        assert_eq!(err, CartError::QuantityLimit { product_id: 1 });
        assert_eq!(cart.items()[0].quantity, 2);

        let err = cart.add_quantity(&cola, MAX_LINE_QUANTITY - 1).unwrap_err();
        assert_eq!(err, CartError::QuantityLimit { product_id: 1 });
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn oversized_line_is_rejected() {
        let mut cart = Cart::new();
        assert!(
            cart.add_quantity(&product(1, "Cola", 500), MAX_LINE_QUANTITY + 1)
                .is_err()
        );
        assert!(cart.is_empty());

        cart.add(&product(1, "Cola", 500)).unwrap();
        assert!(cart.set_quantity(1, MAX_LINE_QUANTITY + 1).is_err());
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn clear_empties_cart() {
        let mut cart = Cart::new();
        cart.add(&product(1, "Cola", 500)).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }
}
