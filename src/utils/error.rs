use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Missing required credential field: {field}")]
    MissingCredentialError { field: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Remote service returned HTTP {status}: {message}")]
    HttpStatusError { status: u16, message: String },

    #[error("SOAP fault: {message}")]
    SoapFaultError { message: String },

    #[error("Malformed response: {message}")]
    ResponseFormatError { message: String },

    #[error("Invalid date '{value}': {reason}")]
    DateParseError { value: String, reason: String },

    #[error("Invalid period {month}/{year}")]
    InvalidPeriodError { year: i32, month: u32 },

    #[error("Erro ao buscar contratos do mês {month}/{year}: {source}")]
    FetchFailed {
        year: i32,
        month: u32,
        #[source]
        source: Box<EtlError>,
    },

    #[error("{message}")]
    AccessError { message: String },

    #[error("{message}")]
    DirectoryError { message: String },

    #[error("Password hashing failed: {0}")]
    HashError(#[from] bcrypt::BcryptError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    RemoteService,
    DataShape,
    Access,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn directory(message: impl Into<String>) -> Self {
        EtlError::DirectoryError {
            message: message.into(),
        }
    }

    pub fn access(message: impl Into<String>) -> Self {
        EtlError::AccessError {
            message: message.into(),
        }
    }

    pub fn response_format(message: impl Into<String>) -> Self {
        EtlError::ResponseFormatError {
            message: message.into(),
        }
    }

    /// Wraps a failure with the period being fetched, unless it already carries one.
    pub fn for_period(self, year: i32, month: u32) -> Self {
        match self {
            wrapped @ EtlError::FetchFailed { .. } => wrapped,
            other => EtlError::FetchFailed {
                year,
                month,
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, skipping the period wrapper.
    pub fn root(&self) -> &EtlError {
        match self {
            EtlError::FetchFailed { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self.root() {
            EtlError::MissingCredentialError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::ConfigError { .. }
            | EtlError::InvalidPeriodError { .. } => ErrorCategory::Configuration,
            EtlError::ApiError(_)
            | EtlError::HttpStatusError { .. }
            | EtlError::SoapFaultError { .. } => ErrorCategory::RemoteService,
            EtlError::ResponseFormatError { .. } | EtlError::DateParseError { .. } => {
                ErrorCategory::DataShape
            }
            EtlError::AccessError { .. } | EtlError::HashError(_) => ErrorCategory::Access,
            EtlError::DirectoryError { .. }
            | EtlError::IoError(_)
            | EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::TomlSerializeError(_) => ErrorCategory::Storage,
            EtlError::FetchFailed { .. } => unreachable!("root() never returns a wrapper"),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Access => ErrorSeverity::Medium,
            ErrorCategory::RemoteService | ErrorCategory::DataShape => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuração inválida: {}", self),
            ErrorCategory::RemoteService => {
                format!("Falha na comunicação com o serviço de contratos: {}", self)
            }
            ErrorCategory::DataShape => format!("Resposta inesperada do serviço: {}", self),
            ErrorCategory::Access => self.to_string(),
            ErrorCategory::Storage => format!("Erro ao gravar ou ler dados locais: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.root() {
            EtlError::MissingCredentialError { .. } => {
                "Verifique o tenant, o ambiente e as credenciais do operador"
            }
            EtlError::InvalidPeriodError { .. } => "Informe um mês entre 1 e 12 e um ano válido",
            EtlError::HttpStatusError { status: 401, .. }
            | EtlError::HttpStatusError { status: 403, .. } => {
                "Confira o email e a senha do operador"
            }
            EtlError::SoapFaultError { .. } => {
                "Confira o GUID do tenant e o ambiente cadastrados para a empresa"
            }
            EtlError::ApiError(_) | EtlError::HttpStatusError { .. } => {
                "Verifique a conexão de rede e tente novamente"
            }
            EtlError::ResponseFormatError { .. } | EtlError::DateParseError { .. } => {
                "Repita a consulta; se persistir, contate o suporte do serviço"
            }
            EtlError::AccessError { .. } => "Faça login com um usuário autorizado",
            _ => match self.category() {
                ErrorCategory::Configuration => "Revise o arquivo de configuração",
                ErrorCategory::Storage => "Verifique permissões e espaço em disco",
                _ => "Tente novamente",
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
