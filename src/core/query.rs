use crate::core::access::AccessControl;
use crate::core::directory::Directory;
use crate::core::fetcher::ContractFetcher;
use crate::domain::model::ContractSummary;
use crate::domain::ports::GatewayConnector;
use chrono::Datelike;

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2100;

/// Raw form input, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pub mes: String,
    pub ano: String,
    pub empresa: String,
    pub operador: String,
}

/// Result list plus the status channel: an empty list alone does not say
/// whether the query failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    pub contratos: Vec<ContractSummary>,
    pub mensagem: String,
    pub sucesso: bool,
}

impl QueryOutcome {
    fn success(contratos: Vec<ContractSummary>) -> Self {
        let mensagem = format!("Encontrados {} contratos", contratos.len());
        Self {
            contratos,
            mensagem,
            sucesso: true,
        }
    }

    fn failure(mensagem: impl Into<String>) -> Self {
        Self {
            contratos: Vec::new(),
            mensagem: mensagem.into(),
            sucesso: false,
        }
    }
}

/// Parses and range-checks month and year, returning `(ano, mes)`.
pub fn parse_period(mes: &str, ano: &str) -> std::result::Result<(i32, u32), String> {
    let (mes, ano) = (mes.trim(), ano.trim());
    if mes.is_empty() || ano.is_empty() {
        return Err("Mês e ano são obrigatórios".to_string());
    }
    let (Ok(mes), Ok(ano)) = (mes.parse::<u32>(), ano.parse::<i32>()) else {
        return Err("Mês e ano devem ser números válidos".to_string());
    };
    if !(1..=12).contains(&mes) {
        return Err("Mês deve estar entre 1 e 12".to_string());
    }
    if !(MIN_YEAR..=MAX_YEAR).contains(&ano) {
        return Err("Ano inválido".to_string());
    }
    Ok((ano, mes))
}

/// Caller-side contract search: validates the form, resolves credentials,
/// fetches, and narrows the result to what the user may see.
pub struct ContractQuery<C: GatewayConnector> {
    fetcher: ContractFetcher<C>,
}

impl<C: GatewayConnector> ContractQuery<C> {
    pub fn new(fetcher: ContractFetcher<C>) -> Self {
        Self { fetcher }
    }

    /// `access` is the dashboard session, if the caller has one.
    pub async fn buscar_contratos(
        &self,
        directory: &Directory,
        access: Option<&AccessControl>,
        params: &QueryParams,
    ) -> QueryOutcome {
        let (ano, mes) = match parse_period(&params.mes, &params.ano) {
            Ok(period) => period,
            Err(mensagem) => return QueryOutcome::failure(mensagem),
        };

        let empresa = params.empresa.trim();
        let operador = params.operador.trim();
        if empresa.is_empty() || operador.is_empty() {
            return QueryOutcome::failure("Selecione a empresa e o operador");
        }

        if let Some(access) = access {
            if !access.tem_acesso_empresa(directory, empresa) {
                return QueryOutcome::failure(format!(
                    "Sem permissão para consultar a empresa {}",
                    empresa
                ));
            }
        }

        let credentials = match directory.resolve_credentials(empresa, operador) {
            Ok(credentials) => credentials,
            Err(e) => return QueryOutcome::failure(e.to_string()),
        };

        tracing::info!(mes, ano, empresa, operador, "Buscando contratos");
        let contratos = match self.fetcher.fetch_contracts(ano, mes, &credentials).await {
            Ok(contratos) => contratos,
            Err(e) => {
                return QueryOutcome::failure(format!("Erro ao buscar contratos: {}", e.root()))
            }
        };
        let recebidos = contratos.len();

        let contratos = match access {
            Some(access) => access.filtrar_contratos(directory, contratos),
            None => contratos,
        };
        let contratos: Vec<ContractSummary> = contratos
            .into_iter()
            .filter(|c| c.empresa.codigo == empresa)
            .collect();

        tracing::info!(
            recebidos,
            exibidos = contratos.len(),
            "Contratos filtrados por empresa"
        );
        QueryOutcome::success(contratos)
    }

    pub async fn buscar_contratos_mes_atual(
        &self,
        directory: &Directory,
        access: Option<&AccessControl>,
        empresa: &str,
        operador: &str,
    ) -> QueryOutcome {
        let hoje = chrono::Local::now().date_naive();
        let params = QueryParams {
            mes: hoje.month().to_string(),
            ano: hoje.year().to_string(),
            empresa: empresa.to_string(),
            operador: operador.to_string(),
        };
        self.buscar_contratos(directory, access, &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_period_messages() {
        assert_eq!(parse_period("4", "2025"), Ok((2025, 4)));
        assert_eq!(parse_period(" 12 ", "2100"), Ok((2100, 12)));
        assert_eq!(
            parse_period("", "2025").unwrap_err(),
            "Mês e ano são obrigatórios"
        );
        assert_eq!(
            parse_period("abril", "2025").unwrap_err(),
            "Mês e ano devem ser números válidos"
        );
        assert_eq!(
            parse_period("13", "2025").unwrap_err(),
            "Mês deve estar entre 1 e 12"
        );
        assert_eq!(parse_period("0", "2025").unwrap_err(), "Mês deve estar entre 1 e 12");
        assert_eq!(parse_period("4", "1999").unwrap_err(), "Ano inválido");
    }
}
