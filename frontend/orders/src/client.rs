use reqwest::Client;
use tracing::debug;

use crate::{
    config::Config,
    error::AppError,
    models::{FetchRequest, Order},
};

#[derive(Debug, Clone)]
pub struct OrdersClient {
    http: Client,
    endpoint: String,
}

impl OrdersClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self::with_http(http, config))
    }

    pub fn with_http(http: Client, config: &Config) -> Self {
        Self {
            http,
            endpoint: config.fetch_endpoint(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn fetch_orders(&self, user_phone: &str) -> Result<Vec<Order>, AppError> {
        let res = self
            .http
            .post(&self.endpoint)
            .json(&FetchRequest { user_phone })
            .send()
            .await?;

        let status = res.status();
        debug!("Orders endpoint status: {status}");

        if !status.is_success() {
            return Err(AppError::Status(status));
        }

        let json_string = res.text().await?;
        let orders: Vec<Order> = serde_json::from_str(&json_string)?;

        Ok(orders)
    }
}
