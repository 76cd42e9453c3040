//! Outbound frame sinks
//!
//! Each registered frame gets one mpsc sink for host-to-frame deliveries
//! (relayed payloads). Delivery is fire-and-forget: a full or closed sink
//! drops the payload with a log line, matching the no-shared-memory,
//! asynchronous message-passing model.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use viewhost_core::ViewId;

/// Capacity of each per-frame delivery channel
const FRAME_SINK_CAPACITY: usize = 64;

/// Per-view outbound delivery channels
#[derive(Debug, Default)]
pub struct FrameSinks {
    sinks: HashMap<ViewId, mpsc::Sender<serde_json::Value>>,
}

impl FrameSinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a sink for a view, returning the receiving half.
    /// Replaces any previous sink for the same view.
    pub fn attach(&mut self, view_id: ViewId) -> mpsc::Receiver<serde_json::Value> {
        let (tx, rx) = mpsc::channel(FRAME_SINK_CAPACITY);
        self.sinks.insert(view_id, tx);
        rx
    }

    /// Drop the sink for a destroyed view
    pub fn detach(&mut self, view_id: ViewId) {
        self.sinks.remove(&view_id);
    }

    pub fn is_attached(&self, view_id: ViewId) -> bool {
        self.sinks.contains_key(&view_id)
    }

    /// Deliver an opaque payload to a view's frame.
    /// Returns `true` if the payload was accepted by the channel.
    pub fn deliver(&self, view_id: ViewId, data: serde_json::Value) -> bool {
        match self.sinks.get(&view_id) {
            Some(tx) => match tx.try_send(data) {
                Ok(()) => true,
                Err(e) => {
                    warn!("Dropping delivery to view {view_id}: {e}");
                    false
                }
            },
            None => {
                debug!("No sink attached for view {view_id}; dropping delivery");
                false
            }
        }
    }
}
