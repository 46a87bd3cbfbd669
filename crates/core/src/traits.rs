use crate::{HealthStatus, PanelError, QueryRequest, QueryResponse};
use async_trait::async_trait;

#[async_trait]
pub trait QueryBackend {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, PanelError>;

    async fn health(&self) -> Result<HealthStatus, PanelError>;
}
