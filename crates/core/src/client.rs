use crate::traits::QueryBackend;
use crate::{ErrorBody, HealthStatus, PanelConfig, PanelError, QueryRequest, QueryResponse};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

pub struct HttpQueryClient {
    client: Client,
    base_url: Url,
}

impl HttpQueryClient {
    pub fn new(base_url: Url) -> Self {
        let mut base_url = base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn from_config(config: &PanelConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, PanelError> {
        Ok(self.base_url.join(path)?)
    }
}

#[async_trait]
impl QueryBackend for HttpQueryClient {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, PanelError> {
        let url = self.endpoint("query")?;
        debug!(%url, mode = %request.mode, "posting query");

        let response = self.client.post(url).json(request).send().await?;
        decode(response).await
    }

    async fn health(&self) -> Result<HealthStatus, PanelError> {
        let url = self.endpoint("health")?;
        let response = self.client.get(url).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, PanelError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let details = serde_json::from_str::<ErrorBody>(&body)
            .map(|parsed| parsed.error)
            .unwrap_or(body);
        return Err(PanelError::Status {
            status: status.as_u16(),
            details,
        });
    }

    Ok(serde_json::from_str(&body)?)
}
