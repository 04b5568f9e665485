use serde::{Deserialize, Serialize};
use std::fmt;

/// Company reference carried by each contract, as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmpresaRef {
    #[serde(rename = "Codigo")]
    pub codigo: String,
}

/// One employment contract, normalized for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSummary {
    pub matricula: String,
    pub nome: String,
    pub cpf: String,
    /// `DD/MM/YYYY`
    pub data_admissao: String,
    pub cargo: String,
    pub departamento: String,
    pub situacao: String,
    pub empresa: EmpresaRef,
}

/// Credentials and tenant parameters for one fetch. All four fields are mandatory.
#[derive(Clone, PartialEq, Eq)]
pub struct QueryCredentials {
    pub operator_email: String,
    pub operator_password: String,
    pub tenant_id: String,
    pub environment: String,
}

impl QueryCredentials {
    pub fn new(
        operator_email: impl Into<String>,
        operator_password: impl Into<String>,
        tenant_id: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            operator_email: operator_email.into(),
            operator_password: operator_password.into(),
            tenant_id: tenant_id.into(),
            environment: environment.into(),
        }
    }

    /// Name of the first empty field, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("operator_email", &self.operator_email),
            ("operator_password", &self.operator_password),
            ("tenant_id", &self.tenant_id),
            ("environment", &self.environment),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

impl fmt::Debug for QueryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCredentials")
            .field("operator_email", &self.operator_email)
            .field("operator_password", &"***")
            .field("tenant_id", &self.tenant_id)
            .field("environment", &self.environment)
            .finish()
    }
}

/// Remote filter field codes. Owned by the service; values must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FilterField {
    AdmissionDate = 2,
}

/// Remote filter operation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FilterOperation {
    GreaterOrEqual = 4,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: FilterField,
    pub operation: FilterOperation,
    pub values: Vec<String>,
}

impl FieldFilter {
    pub fn admitted_since(date: chrono::NaiveDate) -> Self {
        Self {
            field: FilterField::AdmissionDate,
            operation: FilterOperation::GreaterOrEqual,
            values: vec![date.format("%Y-%m-%d").to_string()],
        }
    }
}

/// One "consult by demand" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub filters: Vec<FieldFilter>,
    pub company_codes: Vec<String>,
}

/// A contract record as the service sent it, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawContract {
    pub nome: Option<String>,
    pub cpf: Option<String>,
    pub data_admissao: Option<String>,
    pub cargo: Option<String>,
    pub departamento: Option<String>,
    pub matricula: Option<String>,
    pub situacao: Option<String>,
    pub empresa_codigo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagePayload {
    Records(Vec<RawContract>),
    /// The envelope had no `Retorno` collection for this page.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    pub total_pages: Option<u32>,
    pub payload: PagePayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empresa {
    pub codigo: String,
    pub nome: String,
    pub tenant_id: String,
    pub ambiente: String,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operador {
    pub email: String,
    pub senha: String,
    #[serde(default = "default_true")]
    pub ativo: bool,
}

impl fmt::Debug for Operador {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operador")
            .field("email", &self.email)
            .field("senha", &"***")
            .field("ativo", &self.ativo)
            .finish()
    }
}

/// Dashboard login user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usuario {
    pub username: String,
    pub nome: String,
    /// bcrypt hash
    pub senha_hash: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub empresas: Vec<String>,
}
