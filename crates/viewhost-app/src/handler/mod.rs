//! Handler module - TEA update function and message handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `router`: Frame envelope validation and command dispatch
//! - `pane`: Split-pane layout state machine
//! - `modal`: Modal dialog state machine
//! - `filter`: View filter selection and sequenced application
//! - `links`: Document-detail link store

pub(crate) mod filter;
pub(crate) mod links;
pub(crate) mod modal;
pub(crate) mod pane;
pub(crate) mod router;
pub(crate) mod update;


use crate::message::Message;
use viewhost_core::{ApiToken, DocumentDetailLink, DocumentId, ViewId};
use viewhost_plugin::FilterRequest;

// Re-export main entry point
pub use update::update;

/// Actions that the engine should perform after update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// Issue a sequenced filter application to the backend.
    ///
    /// The completion arrives back as `Message::FilterApplied { seq, .. }`;
    /// responses for superseded sequence numbers are discarded on arrival.
    ApplyFilter { seq: u64, request: FilterRequest },

    /// Persist a newly added document-detail link
    PersistLink {
        document_id: DocumentId,
        link: DocumentDetailLink,
        token: ApiToken,
    },

    /// Reload the link store for a newly opened document
    LoadLinks {
        document_id: DocumentId,
        token: ApiToken,
    },

    /// Deliver an opaque relayed payload to a view's frame sink
    DeliverToFrame {
        view_id: ViewId,
        data: serde_json::Value,
    },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the engine to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
