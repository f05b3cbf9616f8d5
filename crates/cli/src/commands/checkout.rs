//! Checkout command.
//!
//! The CLI has no payment widget, so checkout always runs the offline
//! or fully local path: the order is placed (on the backend when it is
//! reachable), marked paid, and recorded in the local ledger. When the
//! order finalizes paid, the command waits for the auto-delivery timer
//! so the demo ends on a delivered order.

use bloomcart_core::UserId;
use bloomcart_storefront::models::DeliveryAddress;
use bloomcart_storefront::state::AppState;

#[allow(clippy::too_many_arguments)]
pub async fn place(
    state: &AppState,
    user: Option<UserId>,
    name: String,
    phone: String,
    address: String,
    city: String,
    postal_code: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let delivery = DeliveryAddress {
        full_name: name,
        phone,
        address_line: address,
        city,
        postal_code,
    };

    let gateway = state.gateway();
    let mut session = state.session(user);
    let receipt = gateway.place_order(&mut session, &delivery).await?;

    println!("Order {} placed: {}", receipt.order.id, receipt.order.status);
    println!("Total charged: {}", receipt.order.total);
    if let Some(warning) = &receipt.warning {
        println!("Note: {warning}");
    }

    if let Some(timer) = receipt.auto_delivery {
        println!("Waiting for delivery...");
        let _ = timer.await;
        if let Some(order) = gateway.ledger().get(session.user(), &receipt.order.id) {
            println!("Order {} is now {}", order.id, order.status);
        }
    }
    Ok(())
}
