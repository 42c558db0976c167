use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, warn};

use super::DataGateway;
use crate::error::GatewayError;
use crate::payload::{FilterParams, Payload};

/// Where the optimization service listens unless configured otherwise.
pub const DEFAULT_BASE_URL: &str = "http://localhost:26781/api";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`DataGateway`] over the service's JSON HTTP API.
#[derive(Clone)]
pub struct HttpGateway {
    base_url: String,
    client: Client,
}

impl HttpGateway {
    /// Builds a gateway rooted at `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn check(response: Response) -> Result<Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "upstream request rejected");
        Err(GatewayError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn json_body<T: serde::de::DeserializeOwned>(
        response: Response,
    ) -> Result<T, GatewayError> {
        let body = Self::check(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl DataGateway for HttpGateway {
    async fn fetch_payload(&self, filters: &FilterParams) -> Result<Payload, GatewayError> {
        debug!(?filters, "fetching dashboard payload");
        let response = self
            .client
            .get(self.url(""))
            .query(&filters.query_pairs())
            .send()
            .await?;
        Self::json_body(response).await
    }

    async fn trigger_recompute(&self) -> Result<(), GatewayError> {
        debug!("requesting recompute");
        let response = self.client.post(self.url("/regenerate")).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn fetch_export_blob(&self, filters: &FilterParams) -> Result<Vec<u8>, GatewayError> {
        debug!(?filters, "downloading export");
        let response = self
            .client
            .get(self.url("/download_csv"))
            .query(&filters.query_pairs())
            .send()
            .await?;
        let bytes = Self::check(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn fetch_settings(&self) -> Result<String, GatewayError> {
        let response = self.client.get(self.url("/settings")).send().await?;
        Ok(Self::check(response).await?.text().await?)
    }

    async fn update_settings(&self, settings: &Value) -> Result<(), GatewayError> {
        let fields = form_fields(settings);
        debug!(fields = fields.len(), "submitting settings");
        let response = self
            .client
            .post(self.url("/settings"))
            .form(&fields)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

/// Flattens a settings object into form fields.
///
/// A checked box is sent as `on` and an unchecked one is left out, since the
/// service reads a boolean from the field's presence. Nested values are
/// skipped.
fn form_fields(settings: &Value) -> Vec<(String, String)> {
    let Some(object) = settings.as_object() else {
        return Vec::new();
    };
    object
        .iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Bool(true) => "on".to_string(),
                Value::Number(n) => n.to_string(),
                Value::String(s) => s.clone(),
                _ => return None,
            };
            Some((key.clone(), text))
        })
        .collect()
}
