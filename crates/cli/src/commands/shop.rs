//! Catalog browsing.

use bloomcart_storefront::state::AppState;

/// Print the catalog, one product per line.
pub async fn list(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let products = state.backend().products().await?;
    if products.is_empty() {
        println!("The catalog is empty.");
        return Ok(());
    }
    for product in products.iter() {
        let category = product.category.as_deref().unwrap_or("-");
        println!("{:>4}  {:<30} {:>10}  {category}", product.id, product.name, product.price);
    }
    Ok(())
}
