// Domain layer: commission policy, models and ports. No I/O here.

pub mod commission;
pub mod model;
pub mod ports;
