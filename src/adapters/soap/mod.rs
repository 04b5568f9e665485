//! SOAP binding for the remote contract service ("ServicoDeContratoDeTrabalho").

pub mod client;
pub mod envelope;
pub mod response;

pub use client::{SoapConnector, SoapContractClient, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
