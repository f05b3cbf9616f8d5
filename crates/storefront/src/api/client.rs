//! Production `reqwest` implementation of the backend client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bloomcart_core::{OrderId, OrderStatus, ProductId};
use moka::future::Cache;
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::api::types::{
    BackendOrder, CartItemRef, CreateOrderRequest, PaymentInit, PaymentSignature, Product,
};
use crate::api::{BackendError, CheckoutBackend};
use crate::config::StorefrontConfig;

const CATALOG_CACHE_CAPACITY: u64 = 1000;
const CATALOG_CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Cached catalog responses share one cache keyed by request shape.
#[derive(Clone)]
enum CacheValue {
    Products(Arc<Vec<Product>>),
    Product(Arc<Product>),
}

/// Client for the marketplace backend REST API.
///
/// Cheap to clone; catalog reads are cached for 5 minutes.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
    cache: Cache<String, CacheValue>,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    /// Create a client from the storefront configuration.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(CATALOG_CACHE_CAPACITY)
            .time_to_live(CATALOG_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(BackendClientInner {
                http: reqwest::Client::new(),
                base_url: config.api_base_url.as_str().trim_end_matches('/').to_string(),
                api_token: config
                    .api_token
                    .as_ref()
                    .map(|token| token.expose_secret().to_string()),
                cache,
            }),
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{path}", self.inner.base_url);
        let mut builder = self.inner.http.request(method, url);
        if let Some(token) = &self.inner.api_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Send a request and decode the JSON body.
    ///
    /// Reads the body as text first so a non-success status can carry
    /// the backend's message into the error.
    async fn execute<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(truncate(&body, 200)));
        }
        if !status.is_success() {
            warn!(status = %status, body = %truncate(&body, 200), "Backend returned non-success status");
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: truncate(&body, 200),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Like [`Self::execute`] but for endpoints whose body we ignore.
    async fn execute_unit(&self, builder: reqwest::RequestBuilder) -> Result<(), BackendError> {
        let response = builder.send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::NotFound(truncate(&body, 200)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: truncate(&body, 200),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// All catalog products, cached for 5 minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Arc<Vec<Product>>, BackendError> {
        let cache_key = "products".to_string();
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Catalog cache hit");
            return Ok(products);
        }

        let products: Vec<Product> = self.execute(self.request(Method::GET, "products")).await?;
        let products = Arc::new(products);
        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(Arc::clone(&products)))
            .await;
        Ok(products)
    }

    /// One product by id, cached for 5 minutes.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` for unknown ids.
    #[instrument(skip(self))]
    pub async fn product(&self, id: ProductId) -> Result<Arc<Product>, BackendError> {
        let cache_key = format!("product:{id}");
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Catalog cache hit");
            return Ok(product);
        }

        let product: Product = self
            .execute(self.request(Method::GET, &format!("products/{id}")))
            .await?;
        let product = Arc::new(product);
        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Arc::clone(&product)))
            .await;
        Ok(product)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Set an order's status explicitly (for example to cancel it).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the order is unknown.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<BackendOrder, BackendError> {
        self.execute(
            self.request(Method::PUT, &format!("orders/{id}/status"))
                .json(&serde_json::json!({ "status": status })),
        )
        .await
    }
}

#[async_trait]
impl CheckoutBackend for BackendClient {
    #[instrument(skip(self, items), fields(count = items.len()))]
    async fn sync_cart(&self, items: &[CartItemRef]) -> Result<(), BackendError> {
        self.execute_unit(self.request(Method::DELETE, "cart")).await?;
        for item in items {
            self.execute_unit(self.request(Method::POST, "cart/items").json(item))
                .await?;
        }
        debug!("Synced cart to backend");
        Ok(())
    }

    #[instrument(skip(self, request))]
    async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> Result<BackendOrder, BackendError> {
        self.execute(self.request(Method::POST, "orders").json(request))
            .await
    }

    #[instrument(skip(self))]
    async fn create_payment_order(
        &self,
        order_id: &OrderId,
    ) -> Result<PaymentInit, BackendError> {
        self.execute(
            self.request(Method::POST, "payments/create-order")
                .json(&serde_json::json!({ "orderId": order_id })),
        )
        .await
    }

    #[instrument(skip(self, confirmation))]
    async fn confirm_payment(&self, confirmation: &PaymentSignature) -> Result<(), BackendError> {
        self.execute_unit(
            self.request(Method::POST, "payments/success")
                .query(confirmation),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_orders(&self) -> Result<Vec<BackendOrder>, BackendError> {
        self.execute(self.request(Method::GET, "orders")).await
    }

    #[instrument(skip(self))]
    async fn get_order(&self, id: &OrderId) -> Result<BackendOrder, BackendError> {
        self.execute(self.request(Method::GET, &format!("orders/{id}")))
            .await
    }

    #[instrument(skip(self))]
    async fn advance_order_status(&self, id: &OrderId) -> Result<BackendOrder, BackendError> {
        self.execute(self.request(Method::PUT, &format!("orders/{id}/advance-status")))
            .await
    }
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::StorefrontConfig;

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let mut config = StorefrontConfig::for_data_dir("/tmp/bloomcart-test");
        config.api_base_url = url::Url::parse("http://localhost:8080/api/").expect("url");
        let client = BackendClient::new(&config);
        assert_eq!(client.inner.base_url, "http://localhost:8080/api");
    }

    #[test]
    fn test_truncate_limits_error_bodies() {
        assert_eq!(truncate("short", 200), "short");
        assert_eq!(truncate(&"x".repeat(500), 3), "xxx");
    }
}
