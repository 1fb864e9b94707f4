//! API Module
//!
//! HTTP handlers and routing over a shared `ExpiringCache<String>`.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
