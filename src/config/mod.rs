#[cfg(feature = "cli")]
pub mod admin;
#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{Cli, Command, ContratosArgs, EmpresaAcao, OperadorAcao, UsuarioAcao};
pub use toml_config::{AppConfig, ServiceConfig, DEFAULT_CONFIG_PATH};
