//! # viewhost-core - Core Domain Types
//!
//! Foundation crate for the view host. Provides domain types, the protocol
//! message enumeration, error handling, and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on
//! external crates (serde, thiserror, url, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`ViewInstance`] - One embedded plugin frame owned by the host
//! - [`Placement`] - Layout slot a frame occupies (main, right pane, ...)
//! - [`LoadState`] - Frame lifecycle state (Loading, Loaded, Destroyed)
//! - [`Document`], [`FilterChoice`], [`FilterOperation`] - document list and
//!   view-filter vocabulary
//! - [`DocumentDetailLink`] - A plugin-declared link shown on an open document
//!
//! ### Protocol (`messages`)
//! - [`FrameCommand`] - Closed enumeration of commands a plugin may issue
//! - [`MessageEnvelope`] - `sourceViewId` + command, the unit the router
//!   validates
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use viewhost_core::prelude::*;
//! ```

pub mod error;
pub mod logging;
pub mod messages;
pub mod types;

/// Prelude for common imports used throughout all view-host crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use messages::{FrameCommand, MessageEnvelope};
pub use types::{
    ApiToken, Document, DocumentDetailLink, DocumentId, DocumentSetId, FilterChoice,
    FilterOperation, LoadState, PaneSide, Placement, ViewId, ViewInstance,
};
