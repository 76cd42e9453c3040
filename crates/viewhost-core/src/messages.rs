//! Protocol message types exchanged with plugin frames
//!
//! The command set is a closed enumeration: anything that does not parse
//! against it is dropped at the boundary, never duck-typed.

use serde::{Deserialize, Serialize};

use crate::types::{FilterChoice, FilterOperation, ViewId};

/// A command issued by a plugin frame.
///
/// Tagged by the `type` field of the wire payload. Unknown `type` values
/// fail deserialization, which the router treats as a protocol error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FrameCommand {
    /// Open (or keep) a secondary pane showing the given plugin URL
    SetRightPane { url: String },

    /// Open a modal dialog (`url`) or close the current one (`null`)
    SetModalDialog { url: Option<String> },

    /// Replace the set of selectable filter choices for the calling view
    SetViewFilterChoices { choices: Vec<FilterChoice> },

    /// Replace the filter selection and trigger a document-list query
    SetViewFilterSelection {
        ids: Vec<String>,
        #[serde(default)]
        operation: FilterOperation,
    },

    /// Add a link to the currently open document's detail view
    SetDocumentDetailLink { url: String, text: String },

    /// Opaque plugin-to-plugin data, relayed verbatim to the target view
    #[serde(rename_all = "camelCase")]
    ArbitraryPayload {
        target_view_id: ViewId,
        data: serde_json::Value,
    },
}

impl FrameCommand {
    /// Short name used in router logs
    pub fn name(&self) -> &'static str {
        match self {
            FrameCommand::SetRightPane { .. } => "setRightPane",
            FrameCommand::SetModalDialog { .. } => "setModalDialog",
            FrameCommand::SetViewFilterChoices { .. } => "setViewFilterChoices",
            FrameCommand::SetViewFilterSelection { .. } => "setViewFilterSelection",
            FrameCommand::SetDocumentDetailLink { .. } => "setDocumentDetailLink",
            FrameCommand::ArbitraryPayload { .. } => "arbitraryPayload",
        }
    }
}

/// The wire envelope around a [`FrameCommand`].
///
/// `source_view_id` is the identity the plugin claims; the router checks it
/// against the frame binding the message actually arrived on before
/// dispatching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEnvelope {
    pub source_view_id: ViewId,
    #[serde(flatten)]
    pub command: FrameCommand,
}
