use crate::adapters::soap::{SoapConnector, DEFAULT_ENDPOINT};
use crate::core::directory::Directory;
use crate::core::fetcher::{FetchSettings, DEFAULT_PAGE_DELAY};
use crate::domain::model::{Empresa, Operador, Usuario};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_unique, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "contratos.toml";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_delay_ms: Option<u64>,
    /// Company codes sent as a server-side scope on every page request.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub company_filter: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: None,
            page_delay_ms: None,
            company_filter: Vec::new(),
        }
    }
}

/// An operator password read from `${VAR}`; saving writes the placeholder back.
#[derive(Clone, PartialEq, Eq)]
struct EnvSecret {
    placeholder: String,
    resolved: String,
}

impl fmt::Debug for EnvSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvSecret")
            .field("placeholder", &self.placeholder)
            .field("resolved", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub empresas: Vec<Empresa>,
    #[serde(default)]
    pub operadores: Vec<Operador>,
    #[serde(default)]
    pub usuarios: Vec<Usuario>,
    #[serde(skip)]
    env_secrets: Vec<EnvSecret>,
    /// `${VAR}` was substituted somewhere other than an operator password.
    #[serde(skip)]
    env_outside_secrets: bool,
}

impl AppConfig {
    /// Loads and env-substitutes a TOML file. Validation is a separate step.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !path.as_ref().exists() {
            return Err(EtlError::MissingConfigError {
                field: path.as_ref().display().to_string(),
            });
        }
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: AppConfig =
            toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        if processed_content != content {
            config.track_env_secrets(content);
        }
        Ok(config)
    }

    /// Compares against the unsubstituted text to find which operator passwords
    /// came from the environment.
    fn track_env_secrets(&mut self, raw_content: &str) {
        let raw = match toml::from_str::<AppConfig>(raw_content) {
            Ok(raw) if raw.operadores.len() == self.operadores.len() => raw,
            _ => {
                self.env_outside_secrets = true;
                return;
            }
        };

        for (raw_op, op) in raw.operadores.iter().zip(&self.operadores) {
            if raw_op.senha != op.senha {
                self.env_secrets.push(EnvSecret {
                    placeholder: raw_op.senha.clone(),
                    resolved: op.senha.clone(),
                });
            }
        }

        let same_emails = raw
            .operadores
            .iter()
            .zip(&self.operadores)
            .all(|(a, b)| a.email == b.email && a.ativo == b.ativo);
        self.env_outside_secrets = !(same_emails
            && raw.service == self.service
            && raw.empresas == self.empresas
            && raw.usuarios == self.usuarios);
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("service.endpoint", &self.service.endpoint)?;

        if let Some(timeout) = self.service.timeout_seconds {
            validate_positive_number("service.timeout_seconds", timeout, 1)?;
        }
        if let Some(delay) = self.service.page_delay_ms {
            validate_positive_number("service.page_delay_ms", delay, 1)?;
        }

        for empresa in &self.empresas {
            validate_non_empty_string("empresas.codigo", &empresa.codigo)?;
            validate_non_empty_string("empresas.nome", &empresa.nome)?;
            validate_non_empty_string("empresas.tenant_id", &empresa.tenant_id)?;
            validate_non_empty_string("empresas.ambiente", &empresa.ambiente)?;
        }
        validate_unique(
            "empresas.codigo",
            self.empresas.iter().map(|e| e.codigo.as_str()),
        )?;

        for operador in &self.operadores {
            validate_non_empty_string("operadores.email", &operador.email)?;
        }
        validate_unique(
            "operadores.email",
            self.operadores.iter().map(|o| o.email.as_str()),
        )?;

        validate_unique(
            "usuarios.username",
            self.usuarios.iter().map(|u| u.username.as_str()),
        )?;
        for usuario in &self.usuarios {
            for codigo in &usuario.empresas {
                if !self.empresas.iter().any(|e| &e.codigo == codigo) {
                    return Err(EtlError::InvalidConfigValueError {
                        field: format!("usuarios.{}.empresas", usuario.username),
                        value: codigo.clone(),
                        reason: "Unknown company code".to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.service.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn page_delay(&self) -> Duration {
        self.service
            .page_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_PAGE_DELAY)
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings::new(self.page_delay(), self.service.company_filter.clone())
    }

    pub fn connector(&self) -> SoapConnector {
        SoapConnector::new(self.service.endpoint.clone(), self.timeout())
    }

    pub fn directory(&self) -> Directory {
        Directory::new(
            self.empresas.clone(),
            self.operadores.clone(),
            self.usuarios.clone(),
        )
    }

    /// Replaces the directory sections with the current registry contents.
    pub fn update_directory(&mut self, directory: &Directory) {
        self.empresas = directory.empresas().to_vec();
        self.operadores = directory.operadores().to_vec();
        self.usuarios = directory.usuarios().to_vec();
    }

    /// Serializes the config, writing `${VAR}` back for passwords that came from
    /// the environment. Refuses when other substituted values would be resolved.
    pub fn to_toml_string(&self) -> Result<String> {
        if self.env_outside_secrets {
            return Err(EtlError::ConfigError {
                message: "`${VAR}` is used outside operator passwords; edit the file by hand"
                    .to_string(),
            });
        }

        let mut output = self.clone();
        for operador in &mut output.operadores {
            if let Some(secret) = self.env_secrets.iter().find(|s| s.resolved == operador.senha) {
                operador.senha = secret.placeholder.clone();
            }
        }
        Ok(toml::to_string_pretty(&output)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[service]
endpoint = "https://api.example.com/v1/ServicoDeContratoDeTrabalho"
page_delay_ms = 250

[[empresas]]
codigo = "001"
nome = "Grafeno"
tenant_id = "c0ffee00-0000-0000-0000-000000000001"
ambiente = "producao"

[[operadores]]
email = "integracao@grafeno.com"
senha = "segredo"

[[usuarios]]
username = "ana"
nome = "Ana Lima"
senha_hash = "$2b$04$abcdefghijklmnopqrstuu5.MwjrMZbBTZ3ZmAvpxYGEYVUWVeOC6"
empresas = ["001"]
"#;

    #[test]
    fn test_parse_full_config() {
        let config = AppConfig::from_toml_str(SAMPLE).unwrap();

        assert_eq!(config.empresas.len(), 1);
        assert_eq!(config.empresas[0].tenant_id, "c0ffee00-0000-0000-0000-000000000001");
        assert!(config.operadores[0].ativo);
        assert!(!config.usuarios[0].is_admin);
        assert_eq!(config.page_delay(), Duration::from_millis(250));
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECONDS));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.service.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.page_delay(), DEFAULT_PAGE_DELAY);
        assert!(config.fetch_settings().company_filter().is_empty());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CONTRATOS_TEST_OPERADOR_SENHA", "senha-do-ambiente");

        let config = AppConfig::from_toml_str(
            r#"
[[operadores]]
email = "op@x.com"
senha = "${CONTRATOS_TEST_OPERADOR_SENHA}"
"#,
        )
        .unwrap();
        assert_eq!(config.operadores[0].senha, "senha-do-ambiente");

        std::env::remove_var("CONTRATOS_TEST_OPERADOR_SENHA");
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = AppConfig::from_file("/nonexistent/contratos.toml").unwrap_err();
        assert!(matches!(err, EtlError::MissingConfigError { .. }));
    }

    #[test]
    fn test_env_password_is_saved_as_placeholder() {
        std::env::set_var("CONTRATOS_TEST_SAVE_SENHA", "senha-secreta");

        let mut config = AppConfig::from_toml_str(
            r#"
[[operadores]]
email = "env@x.com"
senha = "${CONTRATOS_TEST_SAVE_SENHA}"

[[operadores]]
email = "plain@x.com"
senha = "visivel"
"#,
        )
        .unwrap();
        std::env::remove_var("CONTRATOS_TEST_SAVE_SENHA");
        assert_eq!(config.operadores[0].senha, "senha-secreta");

        let mut directory = config.directory();
        directory
            .atualizar_operador("env@x.com", "renomeado@x.com", "", true)
            .unwrap();
        config.update_directory(&directory);

        let saved = config.to_toml_string().unwrap();
        assert!(!saved.contains("senha-secreta"));
        assert!(saved.contains("${CONTRATOS_TEST_SAVE_SENHA}"));
        assert!(saved.contains("renomeado@x.com"));
        assert!(saved.contains("visivel"));
    }

    #[test]
    fn test_env_outside_passwords_refuses_to_save() {
        std::env::set_var("CONTRATOS_TEST_SAVE_TENANT", "guid-do-ambiente");

        let config = AppConfig::from_toml_str(
            r#"
[[empresas]]
codigo = "001"
nome = "Grafeno"
tenant_id = "${CONTRATOS_TEST_SAVE_TENANT}"
ambiente = "producao"
"#,
        )
        .unwrap();
        std::env::remove_var("CONTRATOS_TEST_SAVE_TENANT");

        assert_eq!(config.empresas[0].tenant_id, "guid-do-ambiente");
        assert!(matches!(
            config.to_toml_string(),
            Err(EtlError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_zero_page_delay_is_rejected() {
        let config = AppConfig::from_toml_str("[service]\npage_delay_ms = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_company_is_rejected() {
        let config = AppConfig::from_toml_str(
            r#"
[[empresas]]
codigo = "001"
nome = "A"
tenant_id = "t"
ambiente = "producao"

[[empresas]]
codigo = "001"
nome = "B"
tenant_id = "t"
ambiente = "producao"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_user_with_unknown_company_is_rejected() {
        let config = AppConfig::from_toml_str(
            r#"
[[usuarios]]
username = "joao"
nome = "João"
senha_hash = "x"
empresas = ["999"]
"#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("999"));
    }

    #[test]
    fn test_save_and_reload() {
        let config = AppConfig::from_toml_str(SAMPLE).unwrap();
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(config.to_toml_string().unwrap().as_bytes())
            .unwrap();

        let reloaded = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(reloaded.empresas, config.empresas);
        assert_eq!(reloaded.usuarios, config.usuarios);
        assert_eq!(reloaded.service.page_delay_ms, Some(250));
    }
}
