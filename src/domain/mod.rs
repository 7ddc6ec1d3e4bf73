// Domain layer: quote models and ports. Nothing here touches I/O.

pub mod model;
pub mod ports;
