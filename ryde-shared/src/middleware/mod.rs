mod auth_extractor;
mod request;
mod tracing_layer;

pub use auth_extractor::*;
pub use request::*;
pub use tracing_layer::*;
