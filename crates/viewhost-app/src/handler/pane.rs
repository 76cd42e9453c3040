//! Split-pane layout state machine
//!
//! States: single, split-active-left, split-active-right. Only one right
//! pane may exist per session; it persists across side toggles until
//! explicitly destroyed.

use tracing::{debug, info, warn};
use url::Url;

use crate::state::SessionState;
use viewhost_core::{PaneSide, Placement};

use super::UpdateResult;

/// `setRightPane(url)`: create the right pane if absent, activate the right
/// side. While a right pane exists the creation part is a no-op.
pub(crate) fn handle_set_right_pane(state: &mut SessionState, url: &str) -> UpdateResult {
    let plugin_url = match Url::parse(url) {
        Ok(u) => u,
        Err(e) => {
            warn!("Dropping setRightPane with invalid URL {url:?}: {e}");
            return UpdateResult::none();
        }
    };

    if state.pane.right_pane_view.is_none() {
        let view_id = state.create_plugin_view(&plugin_url, Placement::RightPane);
        state.pane.right_pane_view = Some(view_id);
        info!("Created right pane view {view_id}");
    } else {
        debug!("Right pane already exists; not recreating");
    }

    state.pane.active_side = PaneSide::Right;
    UpdateResult::none()
}

/// User-initiated side toggle. Never destroys or recreates either frame.
pub(crate) fn handle_activate(state: &mut SessionState, side: PaneSide) -> UpdateResult {
    if state.pane.is_split() {
        state.pane.active_side = side;
        debug!("Pane layout now {}", state.pane.state_label());
    } else {
        debug!("Activate {side:?} with no right pane; ignoring");
    }
    UpdateResult::none()
}

/// Explicit destroy: remove the right-pane view and return to single.
/// A no-op when no right pane exists.
pub(crate) fn handle_close_right_pane(state: &mut SessionState) -> UpdateResult {
    match state.pane.right_pane_view {
        Some(view_id) => {
            state.destroy_view(view_id);
            info!("Right pane view {view_id} destroyed");
        }
        None => debug!("CloseRightPane with no right pane; ignoring"),
    }
    UpdateResult::none()
}
