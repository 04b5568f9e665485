use crate::domain::model::{PageRequest, PageResponse, QueryCredentials};
use crate::utils::error::Result;
use async_trait::async_trait;

/// One authenticated binding to the contract service.
#[async_trait]
pub trait ContractGateway: Send + Sync {
    async fn consult_page(&self, request: &PageRequest) -> Result<PageResponse>;
}

/// Builds a fresh gateway per fetch; nothing is reused between calls.
pub trait GatewayConnector: Send + Sync {
    type Gateway: ContractGateway;

    fn connect(&self, credentials: &QueryCredentials) -> Result<Self::Gateway>;
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
