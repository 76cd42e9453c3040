//! Domain types shared across the view-host crates

use serde::{Deserialize, Serialize};
use url::Url;

/// Identifier of an embedded view (plugin frame)
pub type ViewId = u64;

/// Identifier of a document set
pub type DocumentSetId = u64;

/// Identifier of a single document
pub type DocumentId = u64;

/// Layout slot a frame occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    /// The primary view slot
    Main,

    /// Secondary pane to the right of the main view
    RightPane,

    /// Modal dialog covering the session
    Modal,

    /// Popup opened from a document-detail link
    DocumentDetailPopup,
}

impl Placement {
    /// Value used in frame URL query strings (`placement=right-pane`)
    pub fn as_query_value(&self) -> &'static str {
        match self {
            Placement::Main => "main",
            Placement::RightPane => "right-pane",
            Placement::Modal => "modal",
            Placement::DocumentDetailPopup => "document-detail-popup",
        }
    }
}

/// Frame lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    /// Frame created, content not yet reported loaded
    #[default]
    Loading,

    /// Frame reported its content loaded
    Loaded,

    /// Frame explicitly destroyed by the host
    Destroyed,
}

impl LoadState {
    pub fn is_destroyed(&self) -> bool {
        matches!(self, LoadState::Destroyed)
    }
}

/// Opaque per-view credential authorizing backend calls scoped to a
/// document set.
///
/// Tokens are lowercase alphanumeric and never reused across document sets.
/// Issuance lives in `viewhost-plugin`; this is just the carrier type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One embedded plugin frame, owned exclusively by the host session.
///
/// A `ViewInstance` is destroyed explicitly, never implicitly; a destroyed
/// instance keeps its identity so late messages can be attributed and dropped.
#[derive(Debug, Clone)]
pub struct ViewInstance {
    pub id: ViewId,
    pub document_set_id: DocumentSetId,
    pub placement: Placement,
    /// Full frame source URL (carries server origin, documentSetId, apiToken)
    pub frame_url: Url,
    /// Credential issued for this view
    pub api_token: ApiToken,
    pub load_state: LoadState,
}

impl ViewInstance {
    /// Whether the router should still accept messages from this view
    pub fn accepts_messages(&self) -> bool {
        !self.load_state.is_destroyed()
    }
}

/// Which side of a split layout is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaneSide {
    #[default]
    Left,
    Right,
}

/// One entry of the visible document list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
}

/// A selectable filter choice declared by a plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterChoice {
    pub id: String,
    pub label: String,
}

/// How multiple selected filter ids combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperation {
    /// Documents matching any selected id
    #[default]
    Any,
    /// Documents matching all selected ids
    All,
}

impl FilterOperation {
    /// Value used in backend query strings (`operation=any`)
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperation::Any => "any",
            FilterOperation::All => "all",
        }
    }
}

/// A link surfaced on an open document's detail view.
///
/// Unique by exact `url` within a document; the first write for a URL wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDetailLink {
    pub url: String,
    pub text: String,
}
