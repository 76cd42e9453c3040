//! Modal dialog state machine
//!
//! At most one modal view exists at any instant. Setting a new modal while
//! one is open replaces it (old frame destroyed first), never stacks.

use tracing::{debug, info, warn};
use url::Url;

use crate::state::SessionState;
use viewhost_core::Placement;

use super::UpdateResult;

/// `setModalDialog(url)` opens (replacing any current modal);
/// `setModalDialog(null)` closes.
pub(crate) fn handle_set_modal_dialog(state: &mut SessionState, url: Option<&str>) -> UpdateResult {
    // Validate before touching state so a malformed open doesn't close
    // the current modal as a side effect.
    let plugin_url = match url {
        Some(raw) => match Url::parse(raw) {
            Ok(u) => Some(u),
            Err(e) => {
                warn!("Dropping setModalDialog with invalid URL {raw:?}: {e}");
                return UpdateResult::none();
            }
        },
        None => None,
    };

    if let Some(old) = state.modal.open_view.take() {
        state.destroy_view(old);
        info!("Modal view {old} destroyed");
    }

    match plugin_url {
        Some(u) => {
            let view_id = state.create_plugin_view(&u, Placement::Modal);
            state.modal.open_view = Some(view_id);
            info!("Created modal view {view_id}");
        }
        None => debug!("Modal closed"),
    }

    UpdateResult::none()
}
