use async_trait::async_trait;
use order_notifier_core::{config::SquarespaceConfig, PROJECT_NAME, PROJECT_VERSION};
use snafu::{ensure, ResultExt};

use crate::order_source::{error, Error, OrderListing, OrderSource, UpstreamOrder};

/// Client of the Squarespace Commerce orders API.
#[derive(Clone, Debug)]
pub struct SquarespaceClient {
    http_client: reqwest::Client,

    endpoint: String,

    api_key: String,
}

impl SquarespaceClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        SquarespaceConfig { endpoint, api_key, timeout }: SquarespaceConfig,
    ) -> Result<Self, Error> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("{PROJECT_NAME}/{PROJECT_VERSION}"))
            .build()
            .context(error::BuildHttpClientSnafu)?;

        Ok(Self { http_client, endpoint: endpoint.to_string(), api_key })
    }
}

#[async_trait]
impl OrderSource for SquarespaceClient {
    #[tracing::instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch_orders(&self) -> Result<Vec<UpstreamOrder>, Error> {
        let response = self
            .http_client
            .get(self.endpoint.as_str())
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context(error::SendRequestSnafu { endpoint: self.endpoint.clone() })?;

        let status = response.status();
        ensure!(
            status.is_success(),
            error::UnexpectedStatusSnafu { endpoint: self.endpoint.clone(), status: status.as_u16() }
        );

        let OrderListing { result } = response
            .json()
            .await
            .context(error::DecodeResponseSnafu { endpoint: self.endpoint.clone() })?;

        tracing::debug!(orders = result.len(), "Fetched order listing");
        Ok(result)
    }
}
