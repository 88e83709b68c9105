// Domain layer: value types and the ports NotifyTimer talks through.

pub mod model;
pub mod ports;
