pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::export::{ExportFormat, LocalStorage};
pub use adapters::soap::SoapConnector;
pub use config::AppConfig;
pub use core::access::AccessControl;
pub use core::directory::Directory;
pub use core::fetcher::{ContractFetcher, FetchSettings};
pub use core::query::{ContractQuery, QueryOutcome, QueryParams};
pub use domain::model::{ContractSummary, QueryCredentials};
pub use utils::error::{EtlError, Result};
