//! Posterforged-Common: shared vocabulary for the poster engine.
//!
//! This crate provides the pieces every other posterforged component speaks
//! in terms of:
//!
//! - **Typed IDs**: wrappers for chat users and selection sessions
//! - **Core Types**: poster orientation and request-side filters
//! - **Error Handling**: the engine-wide error taxonomy and result alias
//!
//! # Examples
//!
//! ```
//! use posterforged_common::{Error, KindFilter, PosterKind, Result, SessionId, UserId};
//!
//! let user = UserId::from(42);
//! let session = SessionId::new();
//! assert!(KindFilter::Both.accepts(PosterKind::Portrait));
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("no poster matched"))
//! }
//! ```

pub mod error;
pub mod ids;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
