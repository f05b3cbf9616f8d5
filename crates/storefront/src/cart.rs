//! The working cart: an ordered list of product lines.
//!
//! Lines keep insertion order. Adding a product that is already present
//! merges into the existing line, and driving a quantity to zero or
//! below removes the line entirely, so a cart never holds an empty line.

use bloomcart_core::{FloristId, Money, ProductId};
use serde::{Deserialize, Serialize};

use crate::models::OrderItem;

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    /// Unit price captured when the product was added. The `price` alias
    /// accepts records persisted by older storefront builds.
    #[serde(alias = "price")]
    pub unit_price: Money,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub florist_id: Option<FloristId>,
}

impl CartLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// An ordered collection of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum of line totals, before discount and shipping.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Add `quantity` units of a product.
    ///
    /// The quantity is coerced to a minimum of one unit. Merges into the
    /// existing line if the product is already present; the stored name,
    /// price, and image are refreshed from `line` so a re-add picks up
    /// current catalog data.
    pub fn add(&mut self, mut line: CartLine) {
        line.quantity = line.quantity.max(1);
        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == line.product_id)
        {
            existing.quantity += line.quantity;
            existing.name = line.name;
            existing.unit_price = line.unit_price;
            existing.image_url = line.image_url;
            existing.category = line.category;
            existing.florist_id = line.florist_id;
        } else {
            self.lines.push(line);
        }
    }

    /// Set the quantity of a product's line.
    ///
    /// A quantity of zero or below removes the line. Unknown products
    /// are ignored. Returns `true` if the cart changed.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(product_id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Remove a product's line. Returns `true` if a line was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != before
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Freeze the current lines into order items for checkout.
    #[must_use]
    pub fn snapshot_items(&self) -> Vec<OrderItem> {
        self.lines
            .iter()
            .map(|line| OrderItem {
                product_id: line.product_id,
                name: line.name.clone(),
                unit_price: line.unit_price,
                quantity: line.quantity,
                image_url: line.image_url.clone(),
                florist_id: line.florist_id,
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn rose(quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(1),
            name: "Red Rose Bouquet".to_string(),
            unit_price: Money::from_rupees(300),
            quantity,
            image_url: None,
            category: Some("roses".to_string()),
            florist_id: Some(FloristId::new(11)),
        }
    }

    fn lily(quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(2),
            name: "White Lily Bunch".to_string(),
            unit_price: Money::from_rupees(150),
            quantity,
            image_url: None,
            category: None,
            florist_id: None,
        }
    }

    #[test]
    fn test_add_merges_existing_line() {
        let mut cart = Cart::new();
        cart.add(rose(1));
        cart.add(rose(2));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal(), Money::from_rupees(900));
    }

    #[test]
    fn test_add_refreshes_catalog_data_on_merge() {
        let mut cart = Cart::new();
        cart.add(rose(1));
        let mut repriced = rose(1);
        repriced.unit_price = Money::from_rupees(350);
        cart.add(repriced);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.lines()[0].unit_price, Money::from_rupees(350));
    }

    #[test]
    fn test_zero_quantity_add_is_coerced_to_one() {
        let mut cart = Cart::new();
        cart.add(rose(0));
        assert_eq!(cart.item_count(), 1);
        // Coercion also applies when merging into an existing line.
        cart.add(rose(0));
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_update_quantity_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add(rose(2));
        cart.add(lily(1));
        assert!(cart.update_quantity(ProductId::new(1), 0));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].product_id, ProductId::new(2));
        // Negative quantities behave the same way.
        assert!(cart.update_quantity(ProductId::new(2), -3));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_for_unknown_product_is_noop() {
        let mut cart = Cart::new();
        cart.add(rose(2));
        assert!(!cart.update_quantity(ProductId::new(99), 5));
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut cart = Cart::new();
        cart.add(rose(1));
        cart.add(lily(1));
        cart.add(rose(1));
        let ids: Vec<i64> = cart.lines().iter().map(|l| l.product_id.as_i64()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_snapshot_items_matches_lines() {
        let mut cart = Cart::new();
        cart.add(rose(2));
        cart.add(lily(1));
        let items = cart.snapshot_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].line_total(), Money::from_rupees(600));
        assert_eq!(items[1].quantity, 1);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut cart = Cart::new();
        cart.add(rose(2));
        let json = serde_json::to_string(&cart).expect("serialize");
        let parsed: Cart = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, cart);
    }

    #[test]
    fn test_legacy_price_field_still_parses() {
        let json = r#"[{"productId":1,"name":"Rose","price":"300","quantity":1}]"#;
        let cart: Cart = serde_json::from_str(json).expect("deserialize");
        assert_eq!(cart.lines()[0].unit_price, Money::from_rupees(300));
    }
}
