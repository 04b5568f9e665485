// Adapters layer: concrete implementations for external systems (SOAP service, export files).

pub mod export;
pub mod soap;
