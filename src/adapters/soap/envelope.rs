use crate::domain::model::{PageRequest, QueryCredentials};
use quick_xml::escape::escape;
use std::fmt::Write;

pub const SOAP_ENV_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const SERVICE_NAMESPACE: &str = "lg.com.br/api/v1";
pub const DTO_NAMESPACE: &str = "lg.com.br/api/dto/v1";
pub const ARRAYS_NAMESPACE: &str = "http://schemas.microsoft.com/2003/10/Serialization/Arrays";

pub const OPERATION: &str = "ConsultarListaPorDemanda";
pub const SOAP_ACTION: &str =
    "lg.com.br/api/v1/ServicoDeContratoDeTrabalho/ConsultarListaPorDemanda";

/// Environment context and authentication header blocks, rendered once per
/// fetch and attached to every page request.
pub struct HeaderBlocks {
    xml: String,
}

impl HeaderBlocks {
    pub fn new(credentials: &QueryCredentials) -> Self {
        let xml = format!(
            concat!(
                "<v1:LGContextoAmbiente>",
                "<dto:Ambiente>{ambiente}</dto:Ambiente>",
                "</v1:LGContextoAmbiente>",
                "<v1:LGAutenticacao>",
                "<dto:TokenUsuario>",
                "<dto:Senha>{senha}</dto:Senha>",
                "<dto:Usuario>{usuario}</dto:Usuario>",
                "<dto:GuidTenant>{tenant}</dto:GuidTenant>",
                "</dto:TokenUsuario>",
                "</v1:LGAutenticacao>"
            ),
            ambiente = escape(credentials.environment.as_str()),
            senha = escape(credentials.operator_password.as_str()),
            usuario = escape(credentials.operator_email.as_str()),
            tenant = escape(credentials.tenant_id.as_str()),
        );
        Self { xml }
    }

    pub fn as_xml(&self) -> &str {
        &self.xml
    }
}

/// The `filtro` element of one "consult by demand" call.
pub fn filter_body(request: &PageRequest) -> String {
    let mut xml = String::new();
    let _ = write!(xml, "<v1:filtro><dto:PaginaAtual>{}</dto:PaginaAtual>", request.page);

    if !request.company_codes.is_empty() {
        xml.push_str("<dto:Empresas>");
        for codigo in &request.company_codes {
            let _ = write!(
                xml,
                "<dto:FiltroDeEmpresa><dto:Codigo>{}</dto:Codigo></dto:FiltroDeEmpresa>",
                escape(codigo.as_str())
            );
        }
        xml.push_str("</dto:Empresas>");
    }

    xml.push_str("<dto:FiltrosEspecificos>");
    for filter in &request.filters {
        let _ = write!(
            xml,
            "<dto:FiltroDeCamposEspecificos><dto:Campo>{}</dto:Campo><dto:Operacao>{}</dto:Operacao><dto:ValoresParaFiltrar>",
            filter.field as u8,
            filter.operation as u8
        );
        for value in &filter.values {
            let _ = write!(xml, "<arr:string>{}</arr:string>", escape(value.as_str()));
        }
        xml.push_str("</dto:ValoresParaFiltrar></dto:FiltroDeCamposEspecificos>");
    }
    xml.push_str("</dto:FiltrosEspecificos></v1:filtro>");
    xml
}

pub fn envelope(headers: &HeaderBlocks, request: &PageRequest) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<soapenv:Envelope xmlns:soapenv="{soapenv}" xmlns:v1="{service}" xmlns:dto="{dto}" xmlns:arr="{arrays}">"#,
            "<soapenv:Header>{headers}</soapenv:Header>",
            "<soapenv:Body><v1:{operation}>{filter}</v1:{operation}></soapenv:Body>",
            "</soapenv:Envelope>"
        ),
        soapenv = SOAP_ENV_NAMESPACE,
        service = SERVICE_NAMESPACE,
        dto = DTO_NAMESPACE,
        arrays = ARRAYS_NAMESPACE,
        headers = headers.as_xml(),
        operation = OPERATION,
        filter = filter_body(request),
    )
}
