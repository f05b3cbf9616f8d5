//! Order listing, tracking, and cancellation.

use bloomcart_core::{OrderId, OrderStatus, UserId};
use bloomcart_storefront::api::CheckoutBackend;
use bloomcart_storefront::models::UserKey;
use bloomcart_storefront::state::AppState;

/// List orders: the backend's view when reachable, then any local
/// (`loc_`) orders, which the backend never knows about.
pub async fn list(state: &AppState, user: Option<UserId>) {
    let key = UserKey::from(user);

    match state.backend().list_orders().await {
        Ok(orders) => {
            for order in &orders {
                println!("{:<24} {}", order.id, order.status);
            }
            for order in state.ledger().list_for(key) {
                if order.id.is_local() {
                    println!("{:<24} {} (local)", order.id, order.status);
                }
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Backend unreachable, listing local orders");
            for order in state.ledger().list_for(key) {
                println!("{:<24} {} (local)", order.id, order.status);
            }
        }
    }
}

/// Follow an order until it reaches a terminal status, printing each
/// step as the tracker advances it.
pub async fn track(
    state: &AppState,
    user: Option<UserId>,
    order_id: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let key = UserKey::from(user);
    let id = OrderId::new(order_id);
    let ledger = state.ledger();

    let Some(order) = ledger.get(key, &id) else {
        return Err(format!("no such order: {id}").into());
    };
    println!("{}: {}", id, order.status);
    if order.status.is_terminal() {
        return Ok(());
    }

    let tracker = state.track(key, id.clone()).await;
    let tick = state.config().tracking_tick;
    let mut last = order.status;
    let mut interval = tokio::time::interval(tick);
    interval.tick().await;
    loop {
        interval.tick().await;
        let Some(order) = ledger.get(key, &id) else {
            break;
        };
        if order.status != last {
            println!("{}: {}", id, order.status);
            last = order.status;
        }
        if order.status.is_terminal() {
            break;
        }
    }
    tracker.join().await;
    Ok(())
}

/// Cancel an order, on the backend when it owns it, locally otherwise.
pub async fn cancel(
    state: &AppState,
    user: Option<UserId>,
    order_id: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let key = UserKey::from(user);
    let id = OrderId::new(order_id);

    if !id.is_local() {
        match state
            .backend()
            .update_order_status(&id, OrderStatus::Cancelled)
            .await
        {
            Ok(order) => {
                // Mirror the change into the local copy if one exists.
                state.ledger().update_status(key, &id, order.status);
                println!("Order {} is now {}", id, order.status);
                return Ok(());
            }
            Err(e) => {
                tracing::warn!(error = %e, "Backend cancel failed, cancelling locally");
            }
        }
    }

    match state.ledger().update_status(key, &id, OrderStatus::Cancelled) {
        Some(order) => {
            println!("Order {} is now {}", id, order.status);
            Ok(())
        }
        None => Err(format!("no such order: {id}").into()),
    }
}
