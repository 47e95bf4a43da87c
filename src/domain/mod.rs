// Domain layer: core models and ports (storage interfaces).

pub mod model;
pub mod ports;
