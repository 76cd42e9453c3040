//! Message types for the host session (TEA pattern)

use viewhost_core::{Document, DocumentDetailLink, DocumentId, FilterOperation, PaneSide, ViewId};

/// All possible messages processed by the host update loop.
///
/// Async completions carry their error as a `String` so the enum stays
/// `Clone`; classification happened where the error was produced.
#[derive(Debug, Clone)]
pub enum Message {
    /// Raw message arriving on a registered frame binding.
    ///
    /// `frame_id` is the identity of the binding itself (who the transport
    /// says is talking), which the router checks against the envelope's
    /// claimed `sourceViewId`.
    FrameEnvelope { frame_id: ViewId, body: String },

    /// A frame reported its content loaded
    FrameLoaded { view_id: ViewId },

    /// Host-side request to destroy a view explicitly
    DestroyView { view_id: ViewId },

    // ─────────────────────────────────────────────────────────
    // Pane Messages (host chrome triggers)
    // ─────────────────────────────────────────────────────────
    /// Activate the left or right side of a split layout
    ActivatePane { side: PaneSide },
    /// Destroy the right pane and return to a single layout
    CloseRightPane,

    // ─────────────────────────────────────────────────────────
    // Filter Messages (host chrome triggers; same transition
    // function as the protocol path)
    // ─────────────────────────────────────────────────────────
    /// Replace a view's filter selection (user picked filter chips)
    SetFilterSelection {
        view_id: ViewId,
        ids: Vec<String>,
        operation: FilterOperation,
    },
    /// Clear a view's filter selection ("nix")
    ClearFilter { view_id: ViewId },
    /// Load the default (unfiltered) document list
    RefreshDocumentList,

    // ─────────────────────────────────────────────────────────
    // Document Messages
    // ─────────────────────────────────────────────────────────
    /// A document was opened in the host UI
    OpenDocument { document_id: DocumentId },
    /// A stored document-detail link was clicked
    OpenDetailPopup { document_id: DocumentId, url: String },

    // ─────────────────────────────────────────────────────────
    // Async Completions
    // ─────────────────────────────────────────────────────────
    /// A filter application finished (in any order; stale seqs are dropped)
    FilterApplied {
        seq: u64,
        result: std::result::Result<Vec<Document>, String>,
    },
    /// A link persist finished
    LinkPersisted {
        document_id: DocumentId,
        url: String,
        result: std::result::Result<(), String>,
    },
    /// The link store for a document finished loading
    LinksLoaded {
        document_id: DocumentId,
        result: std::result::Result<Vec<DocumentDetailLink>, String>,
    },

    /// Shut the host loop down
    Quit,
}
