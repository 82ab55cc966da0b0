//! Security header subsystem.
//!
//! # Data Flow
//! ```text
//! config (SecurityHeadersConfig, per scope)
//!     → config::merge (parent + child → RouteSecuritySettings)
//!     → stored on the compiled route as Arc<RouteSecuritySettings>
//!
//! per response:
//!     → stage.rs (SecurityHeadersStage, one pipeline link)
//!     → policy.rs (decide headers from status, scheme, content type)
//!     → headers::set_or_clear (write each header once)
//! ```
//!
//! # Design Decisions
//! - Token hiding runs even when the feature toggle is off
//! - Each conditional step can be toggled through `PolicyGuards`
//! - Settings are immutable once resolved

pub mod content_type;
pub mod modes;
pub mod policy;
pub mod settings;
pub mod stage;

pub use content_type::ContentTypeSet;
pub use modes::{FrameMode, ReferrerPolicy, XssMode};
pub use policy::{apply, PolicyReport};
pub use settings::{PolicyGuards, RouteSecuritySettings};
pub use stage::SecurityHeadersStage;
