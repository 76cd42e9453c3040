//! Document-detail link store
//!
//! Links are deduplicated by exact `url` (first write wins) and persisted
//! through the external backend so they survive a full reload: the store is
//! reloaded from the backend on every document-open, never reconstructed
//! from in-memory messages alone.

use tracing::{debug, info, warn};

use crate::state::SessionState;
use viewhost_core::{DocumentDetailLink, DocumentId, Placement};
use viewhost_plugin::{generate_api_token, popup_url};

use super::{UpdateAction, UpdateResult};

/// `setDocumentDetailLink(url, text)` applies to the currently open
/// document. Duplicate `url` is a complete no-op: no update, no duplicate
/// entry, no second persist.
pub(crate) fn handle_set_link(state: &mut SessionState, url: String, text: String) -> UpdateResult {
    let Some(document_id) = state.open_document else {
        debug!("setDocumentDetailLink with no open document; ignoring");
        return UpdateResult::none();
    };

    let link = DocumentDetailLink { url, text };
    if !state.add_link(document_id, link.clone()) {
        debug!("Link {} already stored for document {document_id}", link.url);
        return UpdateResult::none();
    }

    info!("Added link {} to document {document_id}", link.url);
    UpdateResult::action(UpdateAction::PersistLink {
        document_id,
        link,
        token: state.session_token.clone(),
    })
}

/// A document was opened: reload its link store from the backend so the
/// set is correct even right after a full restart.
pub(crate) fn handle_open_document(
    state: &mut SessionState,
    document_id: DocumentId,
) -> UpdateResult {
    state.open_document = Some(document_id);
    debug!("Document {document_id} opened; loading link store");
    UpdateResult::action(UpdateAction::LoadLinks {
        document_id,
        token: state.session_token.clone(),
    })
}

/// Completion of a link store load
pub(crate) fn handle_links_loaded(
    state: &mut SessionState,
    document_id: DocumentId,
    result: std::result::Result<Vec<DocumentDetailLink>, String>,
) -> UpdateResult {
    match result {
        Ok(links) => {
            debug!("Loaded {} link(s) for document {document_id}", links.len());
            state.replace_links(document_id, links);
            state.link_error = None;
        }
        Err(error) => {
            // Keep whatever is in memory; the next document-open retries.
            warn!("Link store load for document {document_id} failed: {error}");
            state.link_error = Some(error);
        }
    }
    UpdateResult::none()
}

/// Completion of a link persist
pub(crate) fn handle_link_persisted(
    state: &mut SessionState,
    document_id: DocumentId,
    url: &str,
    result: std::result::Result<(), String>,
) -> UpdateResult {
    match result {
        Ok(()) => {
            debug!("Persisted link {url} for document {document_id}");
            state.link_error = None;
        }
        Err(error) => {
            // The link stays visible in memory; it may be absent after a
            // reload since there is no automatic retry.
            warn!("Persisting link {url} for document {document_id} failed: {error}");
            state.link_error = Some(error);
        }
    }
    UpdateResult::none()
}

/// A stored link was clicked: open a document-detail popup whose frame URL
/// carries `documentId` plus the link's own query parameters.
pub(crate) fn handle_open_detail_popup(
    state: &mut SessionState,
    document_id: DocumentId,
    url: &str,
) -> UpdateResult {
    let Some(link) = state
        .links_for(document_id)
        .iter()
        .find(|l| l.url == url)
        .cloned()
    else {
        warn!("Popup requested for unknown link {url} on document {document_id}");
        return UpdateResult::none();
    };

    match popup_url(&link.url, document_id) {
        Ok(frame) => {
            let view_id =
                state.create_view(Placement::DocumentDetailPopup, frame, generate_api_token());
            info!("Created document-detail popup view {view_id}");
        }
        Err(e) => warn!("Cannot build popup URL from {}: {e}", link.url),
    }
    UpdateResult::none()
}
