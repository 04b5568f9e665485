// Domain layer: models and ports. No HTTP or XML here.

pub mod model;
pub mod ports;
