//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (assign request ID)
//!     → routing (pick route: upstream + security settings)
//!     → server.rs (forward to upstream)
//!     → response.rs (run response pipeline, rebuild headers)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id_layer, RequestIdStage, X_REQUEST_ID};
pub use response::{ResponseFinalizer, ResponseMeta};
pub use server::HttpServer;
