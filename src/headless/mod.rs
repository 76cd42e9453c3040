//! Headless mode - JSON event output for driving the host without a UI
//!
//! The host chrome is an external concern; this mode exposes every
//! observable state change as NDJSON on stdout and accepts frame envelopes
//! and host triggers on stdin, so the full runtime can be exercised end to
//! end from scripts.
//!
//! # Event Format
//!
//! One event per line; each has an "event" field indicating its type.
//!
//! ```json
//! {"event":"view_created","view_id":1,"placement":"main","frame_url":"…","timestamp":1704700001000}
//! {"event":"document_list","titles":["First","Second"],"timestamp":1704700002000}
//! {"event":"relay","view_id":1,"data":{"This is":"a message"},"timestamp":1704700003000}
//! ```

pub mod runner;

use chrono::Utc;
use serde::Serialize;
use std::io::{self, Write};
use tracing::error;

use viewhost_core::{DocumentId, ViewId};

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// A view (plugin frame) was created
    ViewCreated {
        view_id: ViewId,
        placement: String,
        frame_url: String,
        timestamp: i64,
    },

    /// A view was destroyed
    ViewDestroyed { view_id: ViewId, timestamp: i64 },

    /// The split-pane layout changed
    PaneLayout { state: String, timestamp: i64 },

    /// The modal slot changed
    Modal {
        open_view_id: Option<ViewId>,
        timestamp: i64,
    },

    /// The visible document list was replaced
    DocumentList {
        titles: Vec<String>,
        timestamp: i64,
    },

    /// A link was added to a document's detail view
    LinkAdded {
        document_id: DocumentId,
        url: String,
        text: String,
        timestamp: i64,
    },

    /// An opaque payload was relayed to a view's frame
    Relay {
        view_id: ViewId,
        data: serde_json::Value,
        timestamp: i64,
    },

    /// Error occurred (transient unless `fatal`)
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Emit this event to stdout as JSON
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        // Write to stdout with newline (NDJSON format)
        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }

        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn view_created(view_id: ViewId, placement: &str, frame_url: &str) -> Self {
        Self::ViewCreated {
            view_id,
            placement: placement.to_string(),
            frame_url: frame_url.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn view_destroyed(view_id: ViewId) -> Self {
        Self::ViewDestroyed {
            view_id,
            timestamp: Self::now(),
        }
    }

    pub fn pane_layout(state: &str) -> Self {
        Self::PaneLayout {
            state: state.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn modal(open_view_id: Option<ViewId>) -> Self {
        Self::Modal {
            open_view_id,
            timestamp: Self::now(),
        }
    }

    pub fn document_list(titles: Vec<String>) -> Self {
        Self::DocumentList {
            titles,
            timestamp: Self::now(),
        }
    }

    pub fn link_added(document_id: DocumentId, url: &str, text: &str) -> Self {
        Self::LinkAdded {
            document_id,
            url: url.to_string(),
            text: text.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn relay(view_id: ViewId, data: serde_json::Value) -> Self {
        Self::Relay {
            view_id,
            data,
            timestamp: Self::now(),
        }
    }

    pub fn error(message: String, fatal: bool) -> Self {
        Self::Error {
            message,
            fatal,
            timestamp: Self::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_created_serialization() {
        let event = HeadlessEvent::view_created(1, "main", "https://p.example/show?server=x");
        let json = serde_json::to_string(&event).expect("serialization failed");

        let value: serde_json::Value = serde_json::from_str(&json).expect("invalid JSON");
        assert_eq!(value["event"], "view_created");
        assert_eq!(value["view_id"], 1);
        assert_eq!(value["placement"], "main");
        assert!(value["timestamp"].is_number());
    }

    #[test]
    fn test_document_list_serialization() {
        let event =
            HeadlessEvent::document_list(vec!["First".to_string(), "Second".to_string()]);
        let json = serde_json::to_string(&event).expect("serialization failed");

        let value: serde_json::Value = serde_json::from_str(&json).expect("invalid JSON");
        assert_eq!(value["event"], "document_list");
        assert_eq!(value["titles"][1], "Second");
    }

    #[test]
    fn test_relay_serialization_keeps_data_verbatim() {
        let event = HeadlessEvent::relay(2, serde_json::json!({"This is": "a message"}));
        let json = serde_json::to_string(&event).expect("serialization failed");

        let value: serde_json::Value = serde_json::from_str(&json).expect("invalid JSON");
        assert_eq!(value["event"], "relay");
        assert_eq!(value["data"]["This is"], "a message");
    }

    #[test]
    fn test_modal_serialization_with_none() {
        let event = HeadlessEvent::modal(None);
        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&event).unwrap()).unwrap();
        assert_eq!(value["event"], "modal");
        assert!(value["open_view_id"].is_null());
    }

    #[test]
    fn test_error_serialization() {
        let event = HeadlessEvent::error("Connection failed".to_string(), true);
        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&event).unwrap()).unwrap();
        assert_eq!(value["event"], "error");
        assert_eq!(value["fatal"], true);
    }
}
