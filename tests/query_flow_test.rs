use contratos_lg::adapters::export::{self, ExportFormat};
use contratos_lg::{AccessControl, AppConfig, ContractFetcher, ContractQuery, QueryParams, SoapConnector};
use httpmock::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn record(matricula: &str, admissao: &str, empresa: &str) -> String {
    format!(
        concat!(
            "<a:ContratoDeTrabalhoParcial>",
            "<a:DataAdmissao>{}T00:00:00</a:DataAdmissao>",
            "<a:Empresa><a:Codigo>{}</a:Codigo></a:Empresa>",
            "<a:Matricula>{}</a:Matricula>",
            "<a:Pessoa><a:Nome>Pessoa {}</a:Nome></a:Pessoa>",
            "</a:ContratoDeTrabalhoParcial>"
        ),
        admissao, empresa, matricula, matricula
    )
}

fn page_response(records: &[String]) -> String {
    format!(
        concat!(
            r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body>"#,
            r#"<ConsultarListaPorDemandaResponse xmlns="lg.com.br/api/v1">"#,
            r#"<ConsultarListaPorDemandaResult xmlns:a="lg.com.br/api/dto/v1">"#,
            "<a:TotalDePaginas>1</a:TotalDePaginas><a:Retorno>{}</a:Retorno>",
            "</ConsultarListaPorDemandaResult></ConsultarListaPorDemandaResponse>",
            "</s:Body></s:Envelope>"
        ),
        records.concat()
    )
}

/// Two companies sharing one tenant, an admin and an analyst linked to "001".
fn write_config(endpoint: &str) -> anyhow::Result<NamedTempFile> {
    let admin_hash = bcrypt::hash("admin123", 4)?;
    let ana_hash = bcrypt::hash("ana123", 4)?;
    let content = format!(
        r#"
[service]
endpoint = "{endpoint}"
timeout_seconds = 5
page_delay_ms = 1

[[empresas]]
codigo = "001"
nome = "Grafeno"
tenant_id = "guid-tenant"
ambiente = "producao"

[[empresas]]
codigo = "002"
nome = "Grafeno Pagamentos"
tenant_id = "guid-tenant"
ambiente = "producao"

[[operadores]]
email = "integracao@grafeno.com"
senha = "segredo"

[[usuarios]]
username = "admin"
nome = "Administrador"
senha_hash = "{admin_hash}"
is_admin = true

[[usuarios]]
username = "ana"
nome = "Ana Lima"
senha_hash = "{ana_hash}"
empresas = ["001"]
"#
    );

    let mut file = NamedTempFile::new()?;
    file.write_all(content.as_bytes())?;
    Ok(file)
}

fn params(mes: &str, ano: &str, empresa: &str) -> QueryParams {
    QueryParams {
        mes: mes.to_string(),
        ano: ano.to_string(),
        empresa: empresa.to_string(),
        operador: "integracao@grafeno.com".to_string(),
    }
}

fn query(config: &AppConfig) -> ContractQuery<SoapConnector> {
    ContractQuery::new(ContractFetcher::new(config.connector(), config.fetch_settings()))
}

fn mixed_month(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(POST)
            .path("/contratos")
            .body_contains("<dto:GuidTenant>guid-tenant</dto:GuidTenant>")
            .body_contains("<arr:string>2025-04-01</arr:string>");
        then.status(200).body(page_response(&[
            record("30", "2025-04-30", "001"),
            record("02", "2025-04-02", "002"),
            record("15", "2025-04-15", "001"),
        ]));
    })
}

#[tokio::test]
async fn test_query_keeps_only_selected_company() -> anyhow::Result<()> {
    let server = MockServer::start();
    let mock = mixed_month(&server);
    let file = write_config(&server.url("/contratos"))?;
    let config = AppConfig::from_file(file.path())?;
    let directory = config.directory();

    let outcome = query(&config)
        .buscar_contratos(&directory, None, &params("4", "2025", "001"))
        .await;

    mock.assert();
    assert!(outcome.sucesso, "{}", outcome.mensagem);
    assert_eq!(outcome.mensagem, "Encontrados 2 contratos");
    let matriculas: Vec<&str> = outcome.contratos.iter().map(|c| c.matricula.as_str()).collect();
    assert_eq!(matriculas, vec!["15", "30"]);

    let csv = export::render(&outcome.contratos, ExportFormat::Csv)?;
    assert_eq!(csv.lines().count(), 3);
    Ok(())
}

#[tokio::test]
async fn test_analyst_cannot_query_unlinked_company() -> anyhow::Result<()> {
    let server = MockServer::start();
    let mock = mixed_month(&server);
    let file = write_config(&server.url("/contratos"))?;
    let config = AppConfig::from_file(file.path())?;
    let directory = config.directory();

    let mut access = AccessControl::new();
    access.login(&directory, "ana", "ana123")?;

    let outcome = query(&config)
        .buscar_contratos(&directory, Some(&access), &params("4", "2025", "002"))
        .await;

    assert_eq!(mock.hits(), 0);
    assert!(!outcome.sucesso);
    assert!(outcome.contratos.is_empty());

    let allowed = query(&config)
        .buscar_contratos(&directory, Some(&access), &params("4", "2025", "001"))
        .await;
    assert!(allowed.sucesso);
    assert_eq!(allowed.contratos.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_invalid_period_is_reported_without_request() -> anyhow::Result<()> {
    let server = MockServer::start();
    let mock = mixed_month(&server);
    let file = write_config(&server.url("/contratos"))?;
    let config = AppConfig::from_file(file.path())?;
    let directory = config.directory();
    let query = query(&config);

    let outcome = query
        .buscar_contratos(&directory, None, &params("13", "2025", "001"))
        .await;
    assert_eq!(outcome.mensagem, "Mês deve estar entre 1 e 12");
    assert!(!outcome.sucesso);

    let outcome = query
        .buscar_contratos(&directory, None, &params("4", "1999", "001"))
        .await;
    assert_eq!(outcome.mensagem, "Ano inválido");

    assert_eq!(mock.hits(), 0);
    Ok(())
}

#[tokio::test]
async fn test_service_failure_becomes_message() -> anyhow::Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/contratos");
        then.status(503).body("Service Unavailable");
    });
    let file = write_config(&server.url("/contratos"))?;
    let config = AppConfig::from_file(file.path())?;
    let directory = config.directory();

    let outcome = query(&config)
        .buscar_contratos(&directory, None, &params("4", "2025", "001"))
        .await;

    assert!(!outcome.sucesso);
    assert!(outcome.contratos.is_empty());
    assert!(
        outcome.mensagem.starts_with("Erro ao buscar contratos: "),
        "{}",
        outcome.mensagem
    );
    assert!(outcome.mensagem.contains("503"));
    assert_eq!(outcome.mensagem.matches("Erro ao buscar contratos").count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_unknown_operator_is_reported() -> anyhow::Result<()> {
    let server = MockServer::start();
    let file = write_config(&server.url("/contratos"))?;
    let config = AppConfig::from_file(file.path())?;
    let directory = config.directory();

    let mut p = params("4", "2025", "001");
    p.operador = "ninguem@grafeno.com".to_string();
    let outcome = query(&config).buscar_contratos(&directory, None, &p).await;

    assert!(!outcome.sucesso);
    assert_eq!(outcome.mensagem, "Operador não encontrado");
    Ok(())
}
