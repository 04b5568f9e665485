use super::envelope::{envelope, HeaderBlocks, SOAP_ACTION};
use super::response::parse_page;
use crate::domain::model::{PageRequest, PageResponse, QueryCredentials};
use crate::domain::ports::{ContractGateway, GatewayConnector};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://prd-api1.lg.com.br/v1/ServicoDeContratoDeTrabalho";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const ERROR_BODY_LIMIT: usize = 300;

/// Builds one authenticated SOAP client per fetch.
#[derive(Debug, Clone)]
pub struct SoapConnector {
    endpoint: String,
    timeout: Duration,
}

impl SoapConnector {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for SoapConnector {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_TIMEOUT)
    }
}

impl GatewayConnector for SoapConnector {
    type Gateway = SoapContractClient;

    fn connect(&self, credentials: &QueryCredentials) -> Result<SoapContractClient> {
        let client = Client::builder().timeout(self.timeout).build()?;
        tracing::debug!(
            endpoint = %self.endpoint,
            operator = %credentials.operator_email,
            tenant = %credentials.tenant_id,
            environment = %credentials.environment,
            "SOAP client bound"
        );

        Ok(SoapContractClient {
            client,
            endpoint: self.endpoint.clone(),
            headers: HeaderBlocks::new(credentials),
            username: credentials.operator_email.clone(),
            password: credentials.operator_password.clone(),
        })
    }
}

pub struct SoapContractClient {
    client: Client,
    endpoint: String,
    headers: HeaderBlocks,
    username: String,
    password: String,
}

fn truncate(body: &str) -> String {
    match body.char_indices().nth(ERROR_BODY_LIMIT) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[async_trait]
impl ContractGateway for SoapContractClient {
    async fn consult_page(&self, request: &PageRequest) -> Result<PageResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.username, Some(&self.password))
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("soapaction", format!("\"{}\"", SOAP_ACTION))
            .body(envelope(&self.headers, request))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(page = request.page, status = status.as_u16(), bytes = body.len(), "SOAP response");

        if !status.is_success() {
            // Faults usually come back as HTTP 500 with a regular envelope.
            if let Err(fault @ EtlError::SoapFaultError { .. }) = parse_page(&body) {
                return Err(fault);
            }
            return Err(EtlError::HttpStatusError {
                status: status.as_u16(),
                message: truncate(&body),
            });
        }

        parse_page(&body)
    }
}
