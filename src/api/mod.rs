//! HTTP surface: router, handlers, shared state, and error mapping.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use types::{AppState, StartupError};
