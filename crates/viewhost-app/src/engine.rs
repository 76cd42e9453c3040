//! The host engine - owns one session and its message loop
//!
//! `Host` wires the pieces together: session state, the message channel,
//! the backend client, and the per-frame outbound sinks. Messages are
//! processed one at a time to completion (follow-ups drained before the
//! next inbound message), so controllers never race within a single view's
//! message stream.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;
use url::Url;

use viewhost_core::{LoadState, Placement, ViewId};
use viewhost_plugin::DocumentBackend;

use crate::actions::handle_action;
use crate::frames::FrameSinks;
use crate::handler::update;
use crate::message::Message;
use crate::state::SessionState;

/// Capacity of the host message channel
const MESSAGE_CHANNEL_CAPACITY: usize = 256;

/// One running host session
pub struct Host<B> {
    pub state: SessionState,
    backend: Arc<B>,
    frames: FrameSinks,
    /// Receivers for frames created during update, until the embedder
    /// claims them with [`Host::take_frame_receiver`]
    unclaimed: HashMap<ViewId, mpsc::Receiver<serde_json::Value>>,
    msg_tx: mpsc::Sender<Message>,
    pub msg_rx: mpsc::Receiver<Message>,
}

impl<B> Host<B>
where
    B: DocumentBackend + Send + Sync + 'static,
{
    pub fn new(state: SessionState, backend: B) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(MESSAGE_CHANNEL_CAPACITY);
        Self {
            state,
            backend: Arc::new(backend),
            frames: FrameSinks::new(),
            unclaimed: HashMap::new(),
            msg_tx,
            msg_rx,
        }
    }

    /// Sender for feeding messages into the loop (frame transports,
    /// host chrome, tests)
    pub fn sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    /// Create the session's main view and attach its frame sink
    pub fn create_main_view(&mut self, plugin_url: &Url) -> ViewId {
        let view_id = self.state.create_plugin_view(plugin_url, Placement::Main);
        info!("Created main view {view_id}");
        self.sync_frames();
        view_id
    }

    /// Claim the delivery receiver for a view's frame.
    ///
    /// Available once after the view is created; the embedder forwards
    /// received payloads into the actual frame transport.
    pub fn take_frame_receiver(
        &mut self,
        view_id: ViewId,
    ) -> Option<mpsc::Receiver<serde_json::Value>> {
        self.unclaimed.remove(&view_id)
    }

    /// Process one message to completion, including follow-ups and actions
    pub fn process_message(&mut self, msg: Message) {
        let mut current = Some(msg);
        while let Some(msg) = current.take() {
            let result = update(&mut self.state, msg);
            if let Some(action) = result.action {
                handle_action(action, self.msg_tx.clone(), self.backend.clone(), &self.frames);
            }
            current = result.message;
        }
        self.sync_frames();
    }

    /// Align frame sinks with the view registry: attach sinks for views
    /// created during update, detach destroyed ones.
    fn sync_frames(&mut self) {
        let live: Vec<ViewId> = self
            .state
            .views()
            .filter(|v| !v.load_state.is_destroyed())
            .map(|v| v.id)
            .collect();
        let destroyed: Vec<ViewId> = self
            .state
            .views()
            .filter(|v| v.load_state == LoadState::Destroyed)
            .map(|v| v.id)
            .collect();

        for view_id in live {
            if !self.frames.is_attached(view_id) {
                let rx = self.frames.attach(view_id);
                self.unclaimed.insert(view_id, rx);
            }
        }
        for view_id in destroyed {
            self.frames.detach(view_id);
            self.unclaimed.remove(&view_id);
        }
    }
}
