//! Response header storage and mutation.
//!
//! # Data Flow
//! ```text
//! upstream HeaderMap
//!     → convert.rs (HeaderList::from_header_map, order and duplicates kept)
//!     → response stages call mutate.rs (set_or_clear) 0..N times
//!     → convert.rs (HeaderList::to_header_map, inactive entries dropped,
//!       built-in Server token added unless a `server` entry exists)
//!     → client
//! ```
//!
//! # Design Decisions
//! - The list is append-only; entries are deactivated, never removed
//! - Lookups compare a lower-cased key computed when the entry is written
//! - After `set_or_clear(name, ..)` at most one entry for `name` is active

pub mod convert;
pub mod list;
pub mod mutate;

pub use list::{HeaderEntry, HeaderError, HeaderList, HeaderListLimits};
pub use mutate::{set_or_clear, Mutation};
