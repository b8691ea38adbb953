//! sigecon-core: shared infrastructure for the SIGECON services.
pub mod middleware;
pub mod observability;

pub use axum;
pub use serde;
pub use tracing;
