//! Headless mode runner - main event loop without a UI
//!
//! Reads frame envelopes and host triggers from stdin, processes them
//! through the host engine, and emits JSON events for every observable
//! state change.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::mpsc;
use url::Url;

use viewhost_app::{
    DocumentBackend, Host, HttpDocumentBackend, Message, SessionState, Settings,
};
use viewhost_core::prelude::*;
use viewhost_core::{DocumentId, FilterOperation, LoadState, PaneSide, ViewId};

use super::HeadlessEvent;

/// Run in headless mode - JSON events on stdout, commands on stdin
pub async fn run_headless(settings: Settings) -> Result<()> {
    info!("═══════════════════════════════════════════════════════");
    info!("View host starting in HEADLESS mode");
    info!("Document set: {}", settings.document_set_id);
    info!("Backend: {}", settings.backend_url);
    info!("═══════════════════════════════════════════════════════");

    let server_origin = Url::parse(&settings.server_origin)
        .map_err(|e| Error::config(format!("server_origin: {e}")))?;
    let backend_url = Url::parse(&settings.backend_url)
        .map_err(|e| Error::config(format!("backend_url: {e}")))?;
    let plugin_url = Url::parse(&settings.plugin_url)
        .map_err(|e| Error::config(format!("plugin_url: {e}")))?;

    let backend = HttpDocumentBackend::new(
        backend_url,
        Duration::from_millis(settings.request_timeout_ms),
    )?;
    let state = SessionState::new(settings.document_set_id, server_origin);
    let mut host = Host::new(state, backend);

    // Headless-specific stdin reader
    let stdin_tx = host.sender();
    std::thread::spawn(move || spawn_stdin_reader_blocking(stdin_tx));

    // Session start: main view plus the default document list
    let mut emitted = EmittedState::default();
    host.create_main_view(&plugin_url);
    host.process_message(Message::RefreshDocumentList);
    forward_new_frames(&mut host);
    emit_state_events(&host, &mut emitted);

    let result = headless_event_loop(&mut host, &mut emitted).await;

    info!("View host headless mode exiting");
    result
}

/// Main headless event loop
async fn headless_event_loop<B>(host: &mut Host<B>, emitted: &mut EmittedState) -> Result<()>
where
    B: DocumentBackend + Send + Sync + 'static,
{
    loop {
        if host.state.should_quit {
            info!("Quit requested");
            break;
        }

        match host.msg_rx.recv().await {
            Some(msg) => {
                host.process_message(msg);
                forward_new_frames(host);
                emit_state_events(host, emitted);
            }
            None => {
                info!("Message channel closed");
                break;
            }
        }
    }

    Ok(())
}

/// Claim delivery receivers for newly created frames and forward relayed
/// payloads to stdout
fn forward_new_frames<B>(host: &mut Host<B>)
where
    B: DocumentBackend + Send + Sync + 'static,
{
    let ids: Vec<ViewId> = host.state.views().map(|v| v.id).collect();
    for view_id in ids {
        if let Some(mut rx) = host.take_frame_receiver(view_id) {
            tokio::spawn(async move {
                while let Some(data) = rx.recv().await {
                    HeadlessEvent::relay(view_id, data).emit();
                }
            });
        }
    }
}

/// What has already been emitted, so each state change is reported once
#[derive(Debug, Default)]
struct EmittedState {
    views: HashMap<ViewId, LoadState>,
    pane_label: String,
    modal: Option<ViewId>,
    doc_titles: Vec<String>,
    link_counts: HashMap<DocumentId, usize>,
    filter_error: Option<String>,
    link_error: Option<String>,
}

/// Emit events for state changes since the previous message
fn emit_state_events<B>(host: &Host<B>, emitted: &mut EmittedState)
where
    B: DocumentBackend + Send + Sync + 'static,
{
    let state = &host.state;

    // View lifecycle
    for view in state.views() {
        match emitted.views.get(&view.id) {
            None => {
                if !view.load_state.is_destroyed() {
                    HeadlessEvent::view_created(
                        view.id,
                        view.placement.as_query_value(),
                        view.frame_url.as_str(),
                    )
                    .emit();
                }
                emitted.views.insert(view.id, view.load_state);
            }
            Some(prev) => {
                if !prev.is_destroyed() && view.load_state.is_destroyed() {
                    HeadlessEvent::view_destroyed(view.id).emit();
                }
                emitted.views.insert(view.id, view.load_state);
            }
        }
    }

    // Layout
    if state.pane.state_label() != emitted.pane_label {
        emitted.pane_label = state.pane.state_label().to_string();
        HeadlessEvent::pane_layout(&emitted.pane_label).emit();
    }
    if state.modal.open_view != emitted.modal {
        emitted.modal = state.modal.open_view;
        HeadlessEvent::modal(emitted.modal).emit();
    }

    // Document list
    let titles: Vec<String> = state.documents.iter().map(|d| d.title.clone()).collect();
    if titles != emitted.doc_titles {
        emitted.doc_titles = titles.clone();
        HeadlessEvent::document_list(titles).emit();
    }

    // Links of the currently open document
    if let Some(document_id) = state.open_document {
        let links = state.links_for(document_id);
        let count = emitted.link_counts.entry(document_id).or_insert(0);
        if *count > links.len() {
            // store was reloaded from the backend; re-announce everything
            *count = 0;
        }
        for link in links.iter().skip(*count) {
            HeadlessEvent::link_added(document_id, &link.url, &link.text).emit();
        }
        *count = links.len();
    }

    // Transient errors
    if state.filter_error != emitted.filter_error {
        emitted.filter_error = state.filter_error.clone();
        if let Some(message) = &emitted.filter_error {
            HeadlessEvent::error(format!("filter: {message}"), false).emit();
        }
    }
    if state.link_error != emitted.link_error {
        emitted.link_error = state.link_error.clone();
        if let Some(message) = &emitted.link_error {
            HeadlessEvent::error(format!("links: {message}"), false).emit();
        }
    }
}

/// A frame envelope fed in through stdin.
///
/// `frameId` is the binding the message "arrives on" (the transport
/// identity); `message` is the protocol envelope a plugin would post.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FrameInput {
    frame_id: ViewId,
    message: serde_json::Value,
}

/// Parse one stdin line into a host message.
///
/// JSON objects are frame envelopes; bare words are host-chrome triggers.
fn parse_stdin_line(line: &str) -> Option<Message> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with('{') {
        return match serde_json::from_str::<FrameInput>(trimmed) {
            Ok(input) => Some(Message::FrameEnvelope {
                frame_id: input.frame_id,
                body: input.message.to_string(),
            }),
            Err(e) => {
                warn!("Ignoring malformed stdin frame input: {e}");
                None
            }
        };
    }

    let mut parts = trimmed.split_whitespace();
    let command = parts.next()?;
    match command {
        "open" => parts
            .next()?
            .parse()
            .ok()
            .map(|document_id| Message::OpenDocument { document_id }),
        "popup" => {
            let document_id = parts.next()?.parse().ok()?;
            let url = parts.next()?.to_string();
            Some(Message::OpenDetailPopup { document_id, url })
        }
        "left" => Some(Message::ActivatePane {
            side: PaneSide::Left,
        }),
        "right" => Some(Message::ActivatePane {
            side: PaneSide::Right,
        }),
        "close-right" => Some(Message::CloseRightPane),
        "select" => {
            let view_id = parts.next()?.parse().ok()?;
            let ids: Vec<String> = parts
                .next()?
                .split(',')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            let operation = match parts.next() {
                Some("all") => FilterOperation::All,
                _ => FilterOperation::Any,
            };
            Some(Message::SetFilterSelection {
                view_id,
                ids,
                operation,
            })
        }
        "nix" => parts
            .next()?
            .parse()
            .ok()
            .map(|view_id| Message::ClearFilter { view_id }),
        "refresh" => Some(Message::RefreshDocumentList),
        "loaded" => parts
            .next()?
            .parse()
            .ok()
            .map(|view_id| Message::FrameLoaded { view_id }),
        "destroy" => parts
            .next()?
            .parse()
            .ok()
            .map(|view_id| Message::DestroyView { view_id }),
        "q" | "quit" => Some(Message::Quit),
        _ => {
            warn!("Unknown stdin command: {trimmed}");
            None
        }
    }
}

/// Stdin reader thread: sends parsed commands into the message channel
fn spawn_stdin_reader_blocking(msg_tx: mpsc::Sender<Message>) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    let reader = stdin.lock();

    for line in reader.lines() {
        match line {
            Ok(line) => {
                if let Some(msg) = parse_stdin_line(&line) {
                    let quit = matches!(msg, Message::Quit);
                    if msg_tx.blocking_send(msg).is_err() {
                        break;
                    }
                    if quit {
                        break;
                    }
                }
            }
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        }
    }

    // EOF shuts the host down so piped scripts terminate cleanly
    let _ = msg_tx.blocking_send(Message::Quit);
    info!("Stdin reader exiting");
}
