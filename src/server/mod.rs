//! HTTP server layer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │                                                                 │
//! │  ┌──────────────────────────┐  ┌─────────────────────────────┐  │
//! │  │        handlers          │  │          routes             │  │
//! │  │ (state, error mapping)   │  │  (router, CORS, tracing)    │  │
//! │  └────────────┬─────────────┘  └─────────────────────────────┘  │
//! └───────────────┼─────────────────────────────────────────────────┘
//!                 ▼
//!          service operations
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    console_handler, custom_log_handler, environment_override_handler, file_link_handler,
    file_sample_handler, gateway_handler, health_handler, queue_handler, AppState, ErrorResponse,
    HealthResponse,
};
pub use routes::{create_router, RouterConfig};
