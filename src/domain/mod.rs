// Domain layer: customer record, prediction result and the ports the engine depends on.

pub mod model;
pub mod ports;
