pub mod access;
pub mod dates;
pub mod directory;
pub mod fetcher;
pub mod query;

pub use crate::domain::model::{ContractSummary, QueryCredentials};
pub use crate::domain::ports::{ContractGateway, GatewayConnector, Storage};
pub use crate::utils::error::Result;
