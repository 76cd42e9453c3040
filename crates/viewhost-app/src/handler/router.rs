//! Frame message router - the single ingestion point for cross-frame messages
//!
//! Validation happens before any controller sees a message:
//! (a) the sending frame binding must be a registered, non-destroyed view;
//! (b) the body must parse against the closed command enumeration;
//! (c) the envelope's claimed `sourceViewId` must match the binding.
//! Anything that fails is dropped and logged, never surfaced to the plugin
//! or the user.

use tracing::{debug, warn};

use crate::state::SessionState;
use viewhost_core::{FrameCommand, ViewId};
use viewhost_plugin::parse_frame_message;

use super::{filter, links, modal, pane, UpdateAction, UpdateResult};

/// Validate and dispatch one raw frame message
pub(crate) fn handle_frame_envelope(
    state: &mut SessionState,
    frame_id: ViewId,
    body: &str,
) -> UpdateResult {
    if !state.is_registered(frame_id) {
        warn!("Dropping message from unregistered frame {frame_id}");
        return UpdateResult::none();
    }

    let Some(envelope) = parse_frame_message(body) else {
        // parse_frame_message already logged the parse failure
        return UpdateResult::none();
    };

    if envelope.source_view_id != frame_id {
        warn!(
            "Dropping message claiming view {} but arriving on frame {frame_id}",
            envelope.source_view_id
        );
        return UpdateResult::none();
    }

    debug!("View {frame_id}: {}", envelope.command.name());
    dispatch(state, frame_id, envelope.command)
}

/// Dispatch a validated command to its owning controller
fn dispatch(state: &mut SessionState, view_id: ViewId, command: FrameCommand) -> UpdateResult {
    match command {
        FrameCommand::SetRightPane { url } => pane::handle_set_right_pane(state, &url),

        FrameCommand::SetModalDialog { url } => {
            modal::handle_set_modal_dialog(state, url.as_deref())
        }

        FrameCommand::SetViewFilterChoices { choices } => {
            filter::handle_set_choices(state, view_id, choices)
        }

        FrameCommand::SetViewFilterSelection { ids, operation } => {
            filter::handle_set_selection(state, view_id, ids, operation)
        }

        FrameCommand::SetDocumentDetailLink { url, text } => {
            links::handle_set_link(state, url, text)
        }

        FrameCommand::ArbitraryPayload {
            target_view_id,
            data,
        } => handle_relay(state, view_id, target_view_id, data),
    }
}

/// Relay opaque plugin-to-plugin data through the host.
///
/// The payload is delivered verbatim to the target view's frame sink --
/// never interpreted, never frame-to-frame.
fn handle_relay(
    state: &SessionState,
    from: ViewId,
    target_view_id: ViewId,
    data: serde_json::Value,
) -> UpdateResult {
    if !state.is_registered(target_view_id) {
        warn!("Dropping relay from view {from} to unknown view {target_view_id}");
        return UpdateResult::none();
    }

    debug!("Relaying payload from view {from} to view {target_view_id}");
    UpdateResult::action(UpdateAction::DeliverToFrame {
        view_id: target_view_id,
        data,
    })
}
