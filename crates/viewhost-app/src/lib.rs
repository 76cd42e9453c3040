//! viewhost-app - Session state and orchestration for the view host
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the
//! plugin-host runtime: one message at a time flows through `update`,
//! mutating session state and emitting actions the engine executes
//! (backend requests, frame deliveries).

pub mod actions;
pub mod config;
pub mod engine;
pub mod frames;
pub mod handler;
pub mod message;
pub mod state;

// Re-export primary types
pub use config::Settings;
pub use engine::Host;
pub use frames::FrameSinks;
pub use handler::{UpdateAction, UpdateResult};
pub use message::Message;
pub use state::{ModalState, PaneLayout, SessionState, ViewFilter};

// Re-export boundary types used by embedders
pub use viewhost_plugin::{DocumentBackend, FilterRequest, HttpDocumentBackend};
