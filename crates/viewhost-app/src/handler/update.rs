//! Main update function - handles state transitions (TEA pattern)
//!
//! One inbound message is processed to completion before the next; there is
//! no reentrant dispatch. Controllers therefore never see a half-applied
//! transition from their own view's message stream, but messages from
//! different views may interleave in any order.

use tracing::{debug, info};

use crate::message::Message;
use crate::state::SessionState;
use viewhost_core::LoadState;

use super::{filter, links, pane, router, UpdateResult};

/// Process a message and update state.
/// Returns optional follow-up message and/or action.
pub fn update(state: &mut SessionState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            state.should_quit = true;
            UpdateResult::none()
        }

        Message::FrameEnvelope { frame_id, body } => {
            router::handle_frame_envelope(state, frame_id, &body)
        }

        Message::FrameLoaded { view_id } => {
            if let Some(view) = state.view_mut(view_id) {
                if !view.load_state.is_destroyed() {
                    view.load_state = LoadState::Loaded;
                    debug!("View {view_id} loaded");
                }
            }
            UpdateResult::none()
        }

        Message::DestroyView { view_id } => {
            if state.destroy_view(view_id) {
                info!("View {view_id} destroyed");
            } else {
                debug!("DestroyView for absent view {view_id}; ignoring");
            }
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Pane Messages
        // ─────────────────────────────────────────────────────────
        Message::ActivatePane { side } => pane::handle_activate(state, side),
        Message::CloseRightPane => pane::handle_close_right_pane(state),

        // ─────────────────────────────────────────────────────────
        // Filter Messages
        // ─────────────────────────────────────────────────────────
        Message::SetFilterSelection {
            view_id,
            ids,
            operation,
        } => filter::handle_set_selection(state, view_id, ids, operation),

        Message::ClearFilter { view_id } => filter::handle_clear(state, view_id),

        Message::RefreshDocumentList => filter::handle_refresh(state),

        Message::FilterApplied { seq, result } => {
            filter::handle_filter_applied(state, seq, result)
        }

        // ─────────────────────────────────────────────────────────
        // Document Messages
        // ─────────────────────────────────────────────────────────
        Message::OpenDocument { document_id } => links::handle_open_document(state, document_id),

        Message::OpenDetailPopup { document_id, url } => {
            links::handle_open_detail_popup(state, document_id, &url)
        }

        Message::LinkPersisted {
            document_id,
            url,
            result,
        } => links::handle_link_persisted(state, document_id, &url, result),

        Message::LinksLoaded {
            document_id,
            result,
        } => links::handle_links_loaded(state, document_id, result),
    }
}
