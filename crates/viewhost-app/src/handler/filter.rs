//! View filter controller
//!
//! Both the protocol path (`setViewFilterSelection`) and the host-UI path
//! (filter chips, "nix") funnel into [`handle_set_selection`] /
//! [`handle_clear`] -- one state-transition function, not two.
//!
//! Every application is tagged with a monotonically increasing sequence
//! number; a completion for a superseded sequence number is discarded on
//! arrival (last-request-wins). In-flight requests are never aborted at the
//! transport level.

use tracing::{debug, warn};

use crate::state::SessionState;
use viewhost_core::{Document, FilterChoice, FilterOperation, ViewId};
use viewhost_plugin::FilterRequest;

use super::{UpdateAction, UpdateResult};

/// `setViewFilterChoices`: replace the choice set for the calling view.
///
/// Selection ids that vanished are pruned; a choices change alone never
/// triggers a backend application.
pub(crate) fn handle_set_choices(
    state: &mut SessionState,
    view_id: ViewId,
    choices: Vec<FilterChoice>,
) -> UpdateResult {
    let filter = state.filter_mut(view_id);
    if filter.set_choices(choices) {
        debug!("View {view_id}: selection pruned after choices update");
    }
    UpdateResult::none()
}

/// Replace selection/operation and trigger a filter application.
///
/// Selected ids must reference declared choices; unknown ids are dropped
/// (the selection ⊆ choices invariant holds by construction).
pub(crate) fn handle_set_selection(
    state: &mut SessionState,
    view_id: ViewId,
    ids: Vec<String>,
    operation: FilterOperation,
) -> UpdateResult {
    if !state.is_registered(view_id) {
        warn!("Dropping filter selection for unknown view {view_id}");
        return UpdateResult::none();
    }

    let filter = state.filter_mut(view_id);
    let before = ids.len();
    let selection: Vec<String> = ids
        .into_iter()
        .filter(|id| filter.has_choice(id))
        .collect();
    if selection.len() != before {
        warn!(
            "View {view_id}: dropped {} selection id(s) not in declared choices",
            before - selection.len()
        );
    }
    filter.selection = selection;
    filter.operation = operation;

    apply(state, view_id)
}

/// Clear the selection ("nix"). This is itself an application with empty
/// selection and participates in the same sequencing.
pub(crate) fn handle_clear(state: &mut SessionState, view_id: ViewId) -> UpdateResult {
    if !state.is_registered(view_id) {
        warn!("Dropping filter clear for unknown view {view_id}");
        return UpdateResult::none();
    }

    state.filter_mut(view_id).selection.clear();
    apply(state, view_id)
}

/// Load the default (unfiltered) document list with the session token.
/// Used at session start, before any view has declared a filter.
pub(crate) fn handle_refresh(state: &mut SessionState) -> UpdateResult {
    let seq = state.next_filter_seq();
    let request = FilterRequest::unfiltered(state.document_set_id, state.session_token.clone());
    UpdateResult::action(UpdateAction::ApplyFilter { seq, request })
}

/// Issue the backend query for a view's current selection
fn apply(state: &mut SessionState, view_id: ViewId) -> UpdateResult {
    let token = match state.view(view_id) {
        Some(view) => view.api_token.clone(),
        None => return UpdateResult::none(),
    };
    let document_set_id = state.document_set_id;
    let filter = state.filter_mut(view_id);
    let request = FilterRequest {
        document_set_id,
        api_token: token,
        ids: filter.selection.clone(),
        operation: filter.operation,
    };

    let seq = state.next_filter_seq();
    debug!(
        "View {view_id}: filter application seq {seq} ({} id(s), {})",
        request.ids.len(),
        request.operation.as_str()
    );
    UpdateResult::action(UpdateAction::ApplyFilter { seq, request })
}

/// Completion of a filter application.
///
/// Success for the latest sequence number replaces the visible document
/// list; failure retains the last known-good list and sets a transient
/// error. Anything older than the latest issued application is stale.
pub(crate) fn handle_filter_applied(
    state: &mut SessionState,
    seq: u64,
    result: std::result::Result<Vec<Document>, String>,
) -> UpdateResult {
    let latest = state.latest_filter_seq();
    if seq < latest {
        debug!("Discarding stale filter response seq {seq} (latest {latest})");
        return UpdateResult::none();
    }

    match result {
        Ok(documents) => {
            debug!("Filter seq {seq}: {} document(s)", documents.len());
            state.documents = documents;
            state.filter_error = None;
        }
        Err(error) => {
            warn!("Filter seq {seq} failed: {error}");
            state.filter_error = Some(error);
        }
    }
    UpdateResult::none()
}
