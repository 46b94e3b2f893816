// Domain layer: test-case models and ports (interfaces).

pub mod model;
pub mod ports;
