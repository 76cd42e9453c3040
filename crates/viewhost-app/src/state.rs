//! Session state for one document-viewing session (Model in TEA pattern)

use std::collections::HashMap;

use url::Url;

use viewhost_core::{
    ApiToken, Document, DocumentDetailLink, DocumentId, DocumentSetId, FilterChoice,
    FilterOperation, LoadState, PaneSide, Placement, ViewId, ViewInstance,
};
use viewhost_plugin::{frame_url, generate_api_token};

/// Split-pane layout state (singleton per session).
///
/// A right pane, once created, persists across side toggles until it is
/// explicitly destroyed; toggling never recreates the frame.
#[derive(Debug, Clone, Default)]
pub struct PaneLayout {
    pub active_side: PaneSide,
    pub right_pane_view: Option<ViewId>,
}

impl PaneLayout {
    pub fn is_split(&self) -> bool {
        self.right_pane_view.is_some()
    }

    /// Human-readable state name used in logs and headless events
    pub fn state_label(&self) -> &'static str {
        match (self.right_pane_view, self.active_side) {
            (None, _) => "single",
            (Some(_), PaneSide::Left) => "split-active-left",
            (Some(_), PaneSide::Right) => "split-active-right",
        }
    }
}

/// Modal dialog state (singleton per session). At most one modal at a time.
#[derive(Debug, Clone, Default)]
pub struct ModalState {
    pub open_view: Option<ViewId>,
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        self.open_view.is_some()
    }
}

/// Per-view filter state: plugin-declared choices plus current selection.
#[derive(Debug, Clone, Default)]
pub struct ViewFilter {
    pub choices: Vec<FilterChoice>,
    pub selection: Vec<String>,
    pub operation: FilterOperation,
}

impl ViewFilter {
    /// Replace the choice set, pruning selection ids that no longer exist.
    ///
    /// Returns `true` if the selection was pruned.
    pub fn set_choices(&mut self, choices: Vec<FilterChoice>) -> bool {
        self.choices = choices;
        let before = self.selection.len();
        self.selection.retain(|id| self.choices.iter().any(|c| &c.id == id));
        before != self.selection.len()
    }

    pub fn has_choice(&self, id: &str) -> bool {
        self.choices.iter().any(|c| c.id == id)
    }

    /// An empty selection means "no filter applied"
    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }
}

/// One document-viewing session.
///
/// Owns every `ViewInstance` and all layout/filter/link state. Explicitly
/// session-scoped (not ambient) so multiple sessions can coexist and be
/// tested in isolation.
#[derive(Debug)]
pub struct SessionState {
    pub document_set_id: DocumentSetId,
    pub server_origin: Url,

    /// Session-scoped token for host-initiated backend calls (link store,
    /// initial document list). View-scoped calls use the view's own token.
    pub session_token: ApiToken,

    views: HashMap<ViewId, ViewInstance>,
    next_view_id: ViewId,

    pub pane: PaneLayout,
    pub modal: ModalState,
    pub filters: HashMap<ViewId, ViewFilter>,

    /// Sequence number of the most recently issued filter application
    filter_seq: u64,

    /// Visible document list (last known good)
    pub documents: Vec<Document>,

    /// Transient error from the most recent failed filter application;
    /// cleared by the next successful one
    pub filter_error: Option<String>,

    /// Currently open document, if any
    pub open_document: Option<DocumentId>,

    links: HashMap<DocumentId, Vec<DocumentDetailLink>>,

    /// Transient error from the most recent failed link persist/load
    pub link_error: Option<String>,

    /// Set by `Message::Quit`; the engine loop exits when it sees this
    pub should_quit: bool,
}

impl SessionState {
    pub fn new(document_set_id: DocumentSetId, server_origin: Url) -> Self {
        Self {
            document_set_id,
            server_origin,
            session_token: generate_api_token(),
            views: HashMap::new(),
            next_view_id: 1,
            pane: PaneLayout::default(),
            modal: ModalState::default(),
            filters: HashMap::new(),
            filter_seq: 0,
            documents: Vec::new(),
            filter_error: None,
            open_document: None,
            links: HashMap::new(),
            link_error: None,
            should_quit: false,
        }
    }

    // ─────────────────────────────────────────────────────────
    // View registry
    // ─────────────────────────────────────────────────────────

    /// Register a view with a prebuilt frame URL (popups use this directly)
    pub fn create_view(&mut self, placement: Placement, frame_url: Url, token: ApiToken) -> ViewId {
        let id = self.next_view_id;
        self.next_view_id += 1;
        self.views.insert(
            id,
            ViewInstance {
                id,
                document_set_id: self.document_set_id,
                placement,
                frame_url,
                api_token: token,
                load_state: LoadState::Loading,
            },
        );
        id
    }

    /// Register a plugin view: issues a fresh token and builds the standard
    /// frame URL (`server`, `documentSetId`, `apiToken`, optional placement).
    pub fn create_plugin_view(&mut self, plugin_url: &Url, placement: Placement) -> ViewId {
        let token = generate_api_token();
        let url = frame_url(
            plugin_url,
            &self.server_origin,
            self.document_set_id,
            &token,
            placement,
        );
        self.create_view(placement, url, token)
    }

    pub fn view(&self, id: ViewId) -> Option<&ViewInstance> {
        self.views.get(&id)
    }

    pub fn view_mut(&mut self, id: ViewId) -> Option<&mut ViewInstance> {
        self.views.get_mut(&id)
    }

    /// All views, in creation order
    pub fn views(&self) -> impl Iterator<Item = &ViewInstance> {
        let mut all: Vec<&ViewInstance> = self.views.values().collect();
        all.sort_by_key(|v| v.id);
        all.into_iter()
    }

    /// Whether the router should accept messages attributed to this view
    pub fn is_registered(&self, id: ViewId) -> bool {
        self.views.get(&id).is_some_and(|v| v.accepts_messages())
    }

    /// Destroy a view explicitly.
    ///
    /// Clears any layout slot the view occupied and drops its filter state.
    /// Destroying a view that is absent or already destroyed is a no-op.
    /// Returns `true` if a live view was destroyed.
    pub fn destroy_view(&mut self, id: ViewId) -> bool {
        let Some(view) = self.views.get_mut(&id) else {
            return false;
        };
        if view.load_state.is_destroyed() {
            return false;
        }
        view.load_state = LoadState::Destroyed;
        self.filters.remove(&id);

        if self.pane.right_pane_view == Some(id) {
            self.pane.right_pane_view = None;
            self.pane.active_side = PaneSide::Left;
        }
        if self.modal.open_view == Some(id) {
            self.modal.open_view = None;
        }
        true
    }

    // ─────────────────────────────────────────────────────────
    // Filter sequencing
    // ─────────────────────────────────────────────────────────

    /// Tag a new filter application; later completions with a smaller
    /// sequence number are stale (last-request-wins).
    pub fn next_filter_seq(&mut self) -> u64 {
        self.filter_seq += 1;
        self.filter_seq
    }

    pub fn latest_filter_seq(&self) -> u64 {
        self.filter_seq
    }

    pub fn filter_mut(&mut self, view_id: ViewId) -> &mut ViewFilter {
        self.filters.entry(view_id).or_default()
    }

    // ─────────────────────────────────────────────────────────
    // Document-detail link store
    // ─────────────────────────────────────────────────────────

    pub fn links_for(&self, document_id: DocumentId) -> &[DocumentDetailLink] {
        self.links.get(&document_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append a link unless its `url` is already present (first write wins).
    ///
    /// Returns `true` if the link was added.
    pub fn add_link(&mut self, document_id: DocumentId, link: DocumentDetailLink) -> bool {
        let links = self.links.entry(document_id).or_default();
        if links.iter().any(|l| l.url == link.url) {
            return false;
        }
        links.push(link);
        true
    }

    /// Replace a document's link set with the backend's persisted state.
    ///
    /// The backend is idempotent under duplicate `url`, but first-write-wins
    /// is enforced here too so a misbehaving backend cannot introduce
    /// duplicates.
    pub fn replace_links(&mut self, document_id: DocumentId, incoming: Vec<DocumentDetailLink>) {
        let mut deduped: Vec<DocumentDetailLink> = Vec::with_capacity(incoming.len());
        for link in incoming {
            if !deduped.iter().any(|l| l.url == link.url) {
                deduped.push(link);
            }
        }
        self.links.insert(document_id, deduped);
    }
}
