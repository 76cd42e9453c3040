//! Action execution - side effects requested by the update loop
//!
//! Network calls run on spawned tasks and feed their completion back into
//! the message channel; they may finish in any order. Supersession is
//! handled at the state layer by sequence number, never by aborting the
//! transport.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use viewhost_plugin::DocumentBackend;

use crate::frames::FrameSinks;
use crate::handler::UpdateAction;
use crate::message::Message;

/// Execute one action produced by `update`
pub fn handle_action<B>(
    action: UpdateAction,
    msg_tx: mpsc::Sender<Message>,
    backend: Arc<B>,
    frames: &FrameSinks,
) where
    B: DocumentBackend + Send + Sync + 'static,
{
    match action {
        UpdateAction::ApplyFilter { seq, request } => {
            tokio::spawn(async move {
                let result = backend
                    .fetch_documents(&request)
                    .await
                    .map_err(|e| e.to_string());
                if msg_tx
                    .send(Message::FilterApplied { seq, result })
                    .await
                    .is_err()
                {
                    debug!("Host loop gone; dropping filter completion seq {seq}");
                }
            });
        }

        UpdateAction::PersistLink {
            document_id,
            link,
            token,
        } => {
            tokio::spawn(async move {
                let result = backend
                    .persist_link(document_id, &link, &token)
                    .await
                    .map_err(|e| e.to_string());
                if msg_tx
                    .send(Message::LinkPersisted {
                        document_id,
                        url: link.url,
                        result,
                    })
                    .await
                    .is_err()
                {
                    debug!("Host loop gone; dropping link persist completion");
                }
            });
        }

        UpdateAction::LoadLinks { document_id, token } => {
            tokio::spawn(async move {
                let result = backend
                    .fetch_links(document_id, &token)
                    .await
                    .map_err(|e| e.to_string());
                if msg_tx
                    .send(Message::LinksLoaded {
                        document_id,
                        result,
                    })
                    .await
                    .is_err()
                {
                    debug!("Host loop gone; dropping link load completion");
                }
            });
        }

        UpdateAction::DeliverToFrame { view_id, data } => {
            frames.deliver(view_id, data);
        }
    }
}
