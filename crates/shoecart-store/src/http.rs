//! # HTTP Catalog Gateway
//!
//! `CatalogGateway` over the shop's JSON REST API.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET {base}/products/{id}  ──►  {"id":1,"title":"...","price":179.9,   │
//! │                                  "image":"..."}                         │
//! │                                                                         │
//! │  GET {base}/stock/{id}     ──►  {"id":1,"amount":3}                     │
//! │                                                                         │
//! │  Outcome mapping                                                        │
//! │  ───────────────                                                        │
//! │  send() fails            ──►  GatewayError::Request                     │
//! │  status not 2xx          ──►  GatewayError::Status (404 = unknown id)   │
//! │  body not JSON / wrong   ──►  GatewayError::MalformedResponse           │
//! │  shape / wrong id                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No retries and no request timeout: a slow catalog simply delays the
//! command that is waiting on it.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shoecart_core::validation::{validate_product, validate_stock};
use shoecart_core::{GatewayError, Product, ProductId, StockInfo};
use tracing::{debug, instrument};
use url::Url;

use crate::gateway::CatalogGateway;

const USER_AGENT: &str = concat!("shoecart/", env!("CARGO_PKG_VERSION"));

/// Catalog gateway backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpCatalogGateway {
    client: Client,
    base_url: Url,
}

impl HttpCatalogGateway {
    /// Creates a gateway for the API rooted at `base_url`.
    pub fn new(base_url: Url) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Creates a gateway sharing an existing client.
    pub fn with_client(client: Client, base_url: Url) -> Self {
        HttpCatalogGateway { client, base_url }
    }

    /// Returns the API root.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds `{base}/{resource}/{id}`, keeping any path prefix on the base.
    fn endpoint(&self, resource: &str, id: ProductId) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::Request(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .push(resource)
            .push(&id.to_string());
        Ok(url)
    }

    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T, GatewayError> {
        debug!(%url, "GET");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        serde_json::from_slice(&body)
            .map_err(|e| GatewayError::MalformedResponse(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl CatalogGateway for HttpCatalogGateway {
    #[instrument(skip_all, fields(product_id = %id))]
    async fn get_product(&self, id: ProductId) -> Result<Product, GatewayError> {
        let product: Product = self.fetch(self.endpoint("products", id)?).await?;
        validate_product(&product, id)
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
        Ok(product)
    }

    #[instrument(skip_all, fields(product_id = %id))]
    async fn get_stock(&self, id: ProductId) -> Result<StockInfo, GatewayError> {
        let stock: StockInfo = self.fetch(self.endpoint("stock", id)?).await?;
        validate_stock(&stock, id).map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
        Ok(stock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(base: &str) -> HttpCatalogGateway {
        HttpCatalogGateway::with_client(Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn test_endpoint_from_bare_host() {
        let url = gateway("http://localhost:3333").endpoint("products", ProductId(1)).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3333/products/1");
    }

    #[test]
    fn test_endpoint_keeps_path_prefix() {
        let gw = gateway("https://shop.example.com/api/");
        assert_eq!(
            gw.endpoint("stock", ProductId(7)).unwrap().as_str(),
            "https://shop.example.com/api/stock/7"
        );

        let gw = gateway("https://shop.example.com/api");
        assert_eq!(
            gw.endpoint("stock", ProductId(7)).unwrap().as_str(),
            "https://shop.example.com/api/stock/7"
        );
    }
}
