use crate::core::dates::{first_day_of_month, parse_display_date, to_display_date};
use crate::domain::model::{
    ContractSummary, EmpresaRef, FieldFilter, PagePayload, PageRequest, QueryCredentials,
    RawContract,
};
use crate::domain::ports::{ContractGateway, GatewayConnector};
use crate::utils::error::{EtlError, Result};
use std::time::Duration;

pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(500);
/// The service is rate-sensitive; some pause between pages always happens.
pub const MIN_PAGE_DELAY: Duration = Duration::from_millis(1);

#[derive(Debug, Clone)]
pub struct FetchSettings {
    page_delay: Duration,
    company_filter: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            page_delay: DEFAULT_PAGE_DELAY,
            company_filter: Vec::new(),
        }
    }
}

impl FetchSettings {
    pub fn new(page_delay: Duration, company_filter: Vec<String>) -> Self {
        Self {
            page_delay: page_delay.max(MIN_PAGE_DELAY),
            company_filter,
        }
    }

    pub fn page_delay(&self) -> Duration {
        self.page_delay
    }

    /// Company codes sent as a server-side scope. Empty means unscoped.
    pub fn company_filter(&self) -> &[String] {
        &self.company_filter
    }
}

/// Fetches every contract admitted on or after the first day of a month,
/// walking all result pages of the contract service.
pub struct ContractFetcher<C: GatewayConnector> {
    connector: C,
    settings: FetchSettings,
}

impl<C: GatewayConnector> ContractFetcher<C> {
    pub fn new(connector: C, settings: FetchSettings) -> Self {
        Self {
            connector,
            settings,
        }
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// Returns the de-paginated list sorted by admission date.
    ///
    /// Missing credentials fail before any request. Any other failure aborts
    /// the whole fetch (no partial result) and is wrapped with the period.
    pub async fn fetch_contracts(
        &self,
        year: i32,
        month: u32,
        credentials: &QueryCredentials,
    ) -> Result<Vec<ContractSummary>> {
        if let Some(field) = credentials.missing_field() {
            tracing::error!(month, year, field, "Contract fetch refused: missing credential");
            return Err(EtlError::MissingCredentialError {
                field: field.to_string(),
            });
        }

        match self.fetch_all_pages(year, month, credentials).await {
            Ok(contracts) => Ok(contracts),
            Err(e) => {
                tracing::error!(month, year, error = %e, "Contract fetch failed");
                Err(e.for_period(year, month))
            }
        }
    }

    async fn fetch_all_pages(
        &self,
        year: i32,
        month: u32,
        credentials: &QueryCredentials,
    ) -> Result<Vec<ContractSummary>> {
        let gateway = self.connector.connect(credentials)?;
        let reference_date = first_day_of_month(year, month)?;
        let admission_filter = FieldFilter::admitted_since(reference_date);

        let mut contracts = Vec::new();
        let mut page: u32 = 0;
        let mut total_pages: Option<u32> = None;

        loop {
            let request = PageRequest {
                page,
                filters: vec![admission_filter.clone()],
                company_codes: self.settings.company_filter.clone(),
            };

            tracing::debug!(page, "Requesting contract page");
            let response = gateway.consult_page(&request).await?;

            // Only the first page's total counts.
            let total = match total_pages {
                Some(total) => total,
                None => {
                    let total = response.total_pages.ok_or_else(|| {
                        EtlError::response_format("first page has no TotalDePaginas")
                    })?;
                    tracing::debug!(total, "Total pages declared by the service");
                    total_pages = Some(total);
                    total
                }
            };

            match response.payload {
                PagePayload::Records(records) => {
                    tracing::debug!(page, count = records.len(), "Contracts received");
                    for raw in records {
                        contracts.push(into_summary(raw)?);
                    }
                }
                PagePayload::Empty => {
                    tracing::info!(page, "No contracts on page");
                }
            }

            page += 1;
            if page >= total {
                break;
            }

            tokio::time::sleep(self.settings.page_delay).await;
        }

        let contracts = sort_by_admission(contracts)?;
        tracing::info!(
            total = contracts.len(),
            pages = page,
            since = %reference_date,
            "Contract fetch completed"
        );
        Ok(contracts)
    }
}

fn into_summary(raw: RawContract) -> Result<ContractSummary> {
    let matricula = raw.matricula.unwrap_or_default();
    let data_admissao = raw.data_admissao.ok_or_else(|| {
        EtlError::response_format(format!("contract {:?} without DataAdmissao", matricula))
    })?;

    Ok(ContractSummary {
        data_admissao: to_display_date(&data_admissao),
        matricula,
        nome: raw.nome.unwrap_or_default(),
        cpf: raw.cpf.unwrap_or_default(),
        cargo: raw.cargo.unwrap_or_default(),
        departamento: raw.departamento.unwrap_or_default(),
        situacao: raw.situacao.unwrap_or_default(),
        empresa: EmpresaRef {
            codigo: raw.empresa_codigo.unwrap_or_default(),
        },
    })
}

/// Stable ascending sort on the parsed `DD/MM/YYYY` date.
fn sort_by_admission(contracts: Vec<ContractSummary>) -> Result<Vec<ContractSummary>> {
    let mut keyed = contracts
        .into_iter()
        .map(|c| Ok((parse_display_date(&c.data_admissao)?, c)))
        .collect::<Result<Vec<_>>>()?;
    keyed.sort_by_key(|(date, _)| *date);
    Ok(keyed.into_iter().map(|(_, c)| c).collect())
}
