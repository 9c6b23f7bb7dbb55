// Domain layer: models and ports (interfaces). Wire names follow the hosted
// store's Portuguese column names; everything else is English.

pub mod model;
pub mod ports;
