//! Cart and coupon management.

use bloomcart_core::{ProductId, UserId};
use bloomcart_storefront::cart::CartLine;
use bloomcart_storefront::state::AppState;

/// Fetch a product and add it to the shopper's cart.
pub async fn add(
    state: &AppState,
    user: Option<UserId>,
    product_id: i64,
    qty: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let product = state.backend().product(ProductId::new(product_id)).await?;
    let mut line = CartLine::from(product.as_ref());
    line.quantity = qty;

    let mut session = state.session(user);
    session.add_line(line);
    println!(
        "Added {qty} x {} ({} in cart, subtotal {})",
        product.name,
        session.cart().item_count(),
        session.cart().subtotal()
    );
    Ok(())
}

/// Print the cart with line and grand totals.
pub fn show(state: &AppState, user: Option<UserId>) {
    let session = state.session(user);
    if session.cart().is_empty() {
        println!("Your cart is empty.");
        return;
    }
    for line in session.cart().lines() {
        println!(
            "{:>4}  {:<30} {} x {} = {}",
            line.product_id,
            line.name,
            line.unit_price,
            line.quantity,
            line.line_total()
        );
    }
    println!("Subtotal: {}", session.cart().subtotal());
    if let Some(code) = session.coupon_code() {
        println!("Coupon {code}: -{}", session.coupon_discount());
    }
}

/// Empty the cart (this also removes any applied coupon).
pub fn clear(state: &AppState, user: Option<UserId>) {
    let mut session = state.session(user);
    session.clear_cart();
    println!("Cart cleared.");
}

/// Apply a promotional code.
pub fn apply_coupon(state: &AppState, user: Option<UserId>, code: &str) {
    let mut session = state.session(user);
    match session.apply_coupon(code) {
        Some(discount) => println!("Coupon applied: -{discount}"),
        None => println!("That code is not valid."),
    }
}

/// Remove the applied code.
pub fn remove_coupon(state: &AppState, user: Option<UserId>) {
    let mut session = state.session(user);
    session.remove_coupon();
    println!("Coupon removed.");
}
