use crate::domain::model::{PagePayload, PageResponse, RawContract};
use crate::utils::error::{EtlError, Result};
use roxmltree::{Document, Node};

const RESULT_ELEMENT: &str = "ConsultarListaPorDemandaResult";
const RECORD_ELEMENT: &str = "ContratoDeTrabalhoParcial";

fn is_element(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| is_element(n, name))
}

/// Text at a path of child elements; nil or blank elements read as `None`.
fn text_at(node: Node, path: &[&str]) -> Option<String> {
    let mut current = node;
    for name in path {
        current = child(current, name)?;
    }
    current
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn fault_message(fault: Node) -> String {
    fault
        .descendants()
        .find(|n| is_element(n, "faultstring") || is_element(n, "Text"))
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
        .unwrap_or_else(|| "unknown SOAP fault".to_string())
}

fn parse_record(node: Node) -> RawContract {
    RawContract {
        nome: text_at(node, &["Pessoa", "Nome"]),
        cpf: text_at(node, &["Pessoa", "Cpf"]),
        data_admissao: text_at(node, &["DataAdmissao"]),
        cargo: text_at(node, &["Cargo", "Descricao"]),
        departamento: text_at(node, &["CentroDeCusto", "Descricao"]),
        matricula: text_at(node, &["Matricula"]),
        situacao: text_at(node, &["SituacaoDoColaborador", "Descricao"]),
        empresa_codigo: text_at(node, &["Empresa", "Codigo"]),
    }
}

/// Decodes one "consult by demand" response envelope.
///
/// A SOAP fault is an error. A missing `Retorno` collection is an empty page,
/// and a missing result element yields no declared total.
pub fn parse_page(xml: &str) -> Result<PageResponse> {
    let doc = Document::parse(xml)
        .map_err(|e| EtlError::response_format(format!("invalid XML: {}", e)))?;

    let body = doc
        .descendants()
        .find(|n| is_element(n, "Body"))
        .ok_or_else(|| EtlError::response_format("SOAP envelope without Body"))?;

    if let Some(fault) = body.descendants().find(|n| is_element(n, "Fault")) {
        return Err(EtlError::SoapFaultError {
            message: fault_message(fault),
        });
    }

    let Some(result) = body.descendants().find(|n| is_element(n, RESULT_ELEMENT)) else {
        return Ok(PageResponse {
            total_pages: None,
            payload: PagePayload::Empty,
        });
    };

    let total_pages = match text_at(result, &["TotalDePaginas"]) {
        Some(raw) => Some(raw.parse::<u32>().map_err(|_| {
            EtlError::response_format(format!("TotalDePaginas is not a number: {}", raw))
        })?),
        None => None,
    };

    let records: Vec<RawContract> = child(result, "Retorno")
        .map(|retorno| {
            retorno
                .children()
                .filter(|n| is_element(n, RECORD_ELEMENT))
                .map(parse_record)
                .collect()
        })
        .unwrap_or_default();

    let payload = if records.is_empty() {
        PagePayload::Empty
    } else {
        PagePayload::Records(records)
    };

    Ok(PageResponse {
        total_pages,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
  <s:Body>
    <ConsultarListaPorDemandaResponse xmlns="lg.com.br/api/v1">
      <ConsultarListaPorDemandaResult xmlns:a="lg.com.br/api/dto/v1" xmlns:i="http://www.w3.org/2001/XMLSchema-instance">
        <a:TotalDePaginas>3</a:TotalDePaginas>
        <a:Retorno>
          <a:ContratoDeTrabalhoParcial>
            <a:Cargo><a:Descricao>Analista de RH</a:Descricao></a:Cargo>
            <a:CentroDeCusto><a:Descricao>Recursos Humanos</a:Descricao></a:CentroDeCusto>
            <a:DataAdmissao>2025-04-15T00:00:00</a:DataAdmissao>
            <a:Empresa><a:Codigo>1</a:Codigo></a:Empresa>
            <a:Matricula>000123</a:Matricula>
            <a:Pessoa><a:Cpf>12345678900</a:Cpf><a:Nome>Maria Souza</a:Nome></a:Pessoa>
            <a:SituacaoDoColaborador><a:Descricao>Ativo</a:Descricao></a:SituacaoDoColaborador>
          </a:ContratoDeTrabalhoParcial>
          <a:ContratoDeTrabalhoParcial>
            <a:Cargo i:nil="true"/>
            <a:DataAdmissao>2025-04-20T00:00:00</a:DataAdmissao>
            <a:Matricula>000124</a:Matricula>
          </a:ContratoDeTrabalhoParcial>
        </a:Retorno>
      </ConsultarListaPorDemandaResult>
    </ConsultarListaPorDemandaResponse>
  </s:Body>
</s:Envelope>"#;

    #[test]
    fn test_parse_records_and_total() {
        let page = parse_page(PAGE).unwrap();
        assert_eq!(page.total_pages, Some(3));

        let PagePayload::Records(records) = page.payload else {
            panic!("expected records");
        };
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].nome.as_deref(), Some("Maria Souza"));
        assert_eq!(records[0].cpf.as_deref(), Some("12345678900"));
        assert_eq!(records[0].departamento.as_deref(), Some("Recursos Humanos"));
        assert_eq!(records[0].empresa_codigo.as_deref(), Some("1"));
        assert_eq!(records[0].data_admissao.as_deref(), Some("2025-04-15T00:00:00"));
        assert_eq!(records[1].cargo, None);
        assert_eq!(records[1].nome, None);
    }

    #[test]
    fn test_missing_retorno_is_empty_page() {
        let xml = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body>
            <ConsultarListaPorDemandaResponse><ConsultarListaPorDemandaResult>
              <TotalDePaginas>2</TotalDePaginas>
            </ConsultarListaPorDemandaResult></ConsultarListaPorDemandaResponse>
        </s:Body></s:Envelope>"#;

        let page = parse_page(xml).unwrap();
        assert_eq!(page.total_pages, Some(2));
        assert_eq!(page.payload, PagePayload::Empty);
    }

    #[test]
    fn test_fault_is_an_error() {
        let xml = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body>
            <s:Fault><faultcode>s:Client</faultcode><faultstring>Usuário ou senha inválidos</faultstring></s:Fault>
        </s:Body></s:Envelope>"#;

        let err = parse_page(xml).unwrap_err();
        assert!(
            matches!(err, EtlError::SoapFaultError { ref message } if message == "Usuário ou senha inválidos")
        );
    }

    #[test]
    fn test_garbage_is_response_format_error() {
        assert!(matches!(
            parse_page("not xml at all"),
            Err(EtlError::ResponseFormatError { .. })
        ));
    }

    #[test]
    fn test_non_numeric_total_is_rejected() {
        let xml = r#"<Envelope><Body><ConsultarListaPorDemandaResult>
            <TotalDePaginas>muitas</TotalDePaginas>
        </ConsultarListaPorDemandaResult></Body></Envelope>"#;
        assert!(parse_page(xml).is_err());
    }
}
