//! End-to-end host session scenarios over a scripted in-memory backend
//!
//! These tests drive the full engine: envelopes go through the router,
//! actions spawn real tasks, completions land back on the message channel
//! in whatever order the backend produces them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use url::Url;

use viewhost_app::{DocumentBackend, FilterRequest, Host, Message, SessionState};
use viewhost_core::{
    ApiToken, Document, DocumentDetailLink, DocumentId, Placement, Result, ViewId,
};

const DOCUMENT_SET_ID: u64 = 1010101;

/// In-memory backend: filter responses are scripted per comma-joined id
/// set, links are actually stored, every filter request is recorded.
#[derive(Debug, Default)]
struct Inner {
    responses: Mutex<HashMap<String, Vec<Document>>>,
    delays: Mutex<HashMap<String, Duration>>,
    links: Mutex<HashMap<DocumentId, Vec<DocumentDetailLink>>>,
    requests: Mutex<Vec<FilterRequest>>,
}

#[derive(Debug, Clone, Default)]
struct ScriptedBackend(Arc<Inner>);

impl ScriptedBackend {
    fn respond(&self, ids: &str, titles: &[&str]) {
        let documents = titles
            .iter()
            .enumerate()
            .map(|(i, t)| Document {
                id: i as u64 + 1,
                title: t.to_string(),
            })
            .collect();
        self.0
            .responses
            .lock()
            .unwrap()
            .insert(ids.to_string(), documents);
    }

    fn delay(&self, ids: &str, delay: Duration) {
        self.0
            .delays
            .lock()
            .unwrap()
            .insert(ids.to_string(), delay);
    }

    fn recorded_requests(&self) -> Vec<FilterRequest> {
        self.0.requests.lock().unwrap().clone()
    }

    fn stored_links(&self, document_id: DocumentId) -> Vec<DocumentDetailLink> {
        self.0
            .links
            .lock()
            .unwrap()
            .get(&document_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl DocumentBackend for ScriptedBackend {
    async fn fetch_documents(&self, request: &FilterRequest) -> Result<Vec<Document>> {
        let key = request.ids.join(",");
        self.0.requests.lock().unwrap().push(request.clone());

        let delay = self.0.delays.lock().unwrap().get(&key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let documents = self
            .0
            .responses
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_default();
        Ok(documents)
    }

    async fn persist_link(
        &self,
        document_id: DocumentId,
        link: &DocumentDetailLink,
        _token: &ApiToken,
    ) -> Result<()> {
        let mut links = self.0.links.lock().unwrap();
        let entry = links.entry(document_id).or_default();
        // idempotent under duplicate url, like the real endpoint
        if !entry.iter().any(|l| l.url == link.url) {
            entry.push(link.clone());
        }
        Ok(())
    }

    async fn fetch_links(
        &self,
        document_id: DocumentId,
        _token: &ApiToken,
    ) -> Result<Vec<DocumentDetailLink>> {
        Ok(self.stored_links(document_id))
    }
}

fn new_host(backend: ScriptedBackend) -> (Host<ScriptedBackend>, ViewId) {
    let state = SessionState::new(
        DOCUMENT_SET_ID,
        Url::parse("http://localhost:9000").unwrap(),
    );
    let mut host = Host::new(state, backend);
    let main_id = host.create_main_view(&Url::parse("https://plugin.example/show").unwrap());
    (host, main_id)
}

/// Process completions from spawned backend tasks until the channel goes
/// quiet for a moment
async fn drain(host: &mut Host<ScriptedBackend>) {
    while let Ok(Some(msg)) =
        tokio::time::timeout(Duration::from_millis(200), host.msg_rx.recv()).await
    {
        host.process_message(msg);
    }
}

fn frame(host: &mut Host<ScriptedBackend>, frame_id: ViewId, body: String) {
    host.process_message(Message::FrameEnvelope { frame_id, body });
}

fn declare_choices(host: &mut Host<ScriptedBackend>, view_id: ViewId) {
    frame(
        host,
        view_id,
        format!(
            r#"{{"sourceViewId":{view_id},"type":"setViewFilterChoices","choices":[{{"id":"foo","label":"VF-Foo"}}]}}"#
        ),
    );
}

fn titles(host: &Host<ScriptedBackend>) -> Vec<String> {
    host.state.documents.iter().map(|d| d.title.clone()).collect()
}

#[tokio::test]
async fn test_main_view_frame_url_carries_credentials_in_order() {
    let (host, main_id) = new_host(ScriptedBackend::default());

    let view = host.state.view(main_id).unwrap();
    let pairs: Vec<(String, String)> = view
        .frame_url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    assert_eq!(pairs.len(), 3);
    assert_eq!(pairs[0], ("server".to_string(), "http://localhost:9000".to_string()));
    assert_eq!(pairs[1].0, "documentSetId");
    assert_eq!(pairs[1].1, DOCUMENT_SET_ID.to_string());
    assert_eq!(pairs[2].0, "apiToken");
    assert_eq!(pairs[2].1, view.api_token.as_str());
    assert!(view
        .api_token
        .as_str()
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
}

#[tokio::test]
async fn test_filter_selection_queries_backend_and_nix_restores() {
    let backend = ScriptedBackend::default();
    backend.respond("", &["First", "Second", "Third"]);
    backend.respond("foo", &["Second"]);

    let (mut host, main_id) = new_host(backend.clone());
    host.process_message(Message::RefreshDocumentList);
    drain(&mut host).await;
    assert_eq!(titles(&host), vec!["First", "Second", "Third"]);

    declare_choices(&mut host, main_id);
    frame(
        &mut host,
        main_id,
        format!(
            r#"{{"sourceViewId":{main_id},"type":"setViewFilterSelection","ids":["foo"],"operation":"any"}}"#
        ),
    );
    drain(&mut host).await;

    assert_eq!(titles(&host), vec!["Second"]);
    let last = backend.recorded_requests().pop().unwrap();
    assert_eq!(last.document_set_id, DOCUMENT_SET_ID);
    assert_eq!(last.ids, vec!["foo".to_string()]);
    assert_eq!(last.operation.as_str(), "any");
    assert_eq!(last.api_token, host.state.view(main_id).unwrap().api_token);

    // nix: clearing is an application with empty selection
    host.process_message(Message::ClearFilter { view_id: main_id });
    drain(&mut host).await;
    assert_eq!(titles(&host), vec!["First", "Second", "Third"]);
    assert!(backend.recorded_requests().pop().unwrap().is_unfiltered());
}

#[tokio::test]
async fn test_slow_stale_response_never_clobbers_newer_selection() {
    let backend = ScriptedBackend::default();
    backend.respond("", &["First", "Second", "Third"]);
    backend.respond("foo", &["Second"]);
    // the foo request is slow; the clearing request overtakes it
    backend.delay("foo", Duration::from_millis(150));

    let (mut host, main_id) = new_host(backend.clone());
    declare_choices(&mut host, main_id);

    frame(
        &mut host,
        main_id,
        format!(
            r#"{{"sourceViewId":{main_id},"type":"setViewFilterSelection","ids":["foo"],"operation":"any"}}"#
        ),
    );
    host.process_message(Message::ClearFilter { view_id: main_id });
    drain(&mut host).await;

    // the slow foo response arrived last but was superseded
    assert_eq!(titles(&host), vec!["First", "Second", "Third"]);
    assert_eq!(backend.recorded_requests().len(), 2);
}

#[tokio::test]
async fn test_modal_relay_reaches_target_frame_verbatim() {
    let (mut host, main_id) = new_host(ScriptedBackend::default());
    let mut main_rx = host.take_frame_receiver(main_id).unwrap();

    frame(
        &mut host,
        main_id,
        format!(
            r#"{{"sourceViewId":{main_id},"type":"setModalDialog","url":"https://plugin.example/modal"}}"#
        ),
    );
    let modal_id = host.state.modal.open_view.unwrap();

    frame(
        &mut host,
        modal_id,
        format!(
            r#"{{"sourceViewId":{modal_id},"type":"arbitraryPayload","targetViewId":{main_id},"data":{{"This is":"a message"}}}}"#
        ),
    );
    frame(
        &mut host,
        modal_id,
        format!(r#"{{"sourceViewId":{modal_id},"type":"setModalDialog","url":null}}"#),
    );

    assert!(!host.state.modal.is_open());
    let delivered = main_rx.try_recv().expect("relay delivered to main frame");
    assert_eq!(delivered, serde_json::json!({"This is": "a message"}));
}

#[tokio::test]
async fn test_links_persist_across_host_restart() {
    let backend = ScriptedBackend::default();
    let link_body = |view_id: ViewId| {
        format!(
            r#"{{"sourceViewId":{view_id},"type":"setDocumentDetailLink","url":"https://plugin.example/detail?foo=foo","text":"Text foo"}}"#
        )
    };

    // first session: open a document, add a link, add the same url again
    {
        let (mut host, main_id) = new_host(backend.clone());
        host.process_message(Message::OpenDocument { document_id: 17 });
        drain(&mut host).await;

        frame(&mut host, main_id, link_body(main_id));
        drain(&mut host).await;

        // same url with different text: no duplicate, no overwrite
        frame(
            &mut host,
            main_id,
            format!(
                r#"{{"sourceViewId":{main_id},"type":"setDocumentDetailLink","url":"https://plugin.example/detail?foo=foo","text":"foo with different text"}}"#
            ),
        );
        drain(&mut host).await;

        assert_eq!(host.state.links_for(17).len(), 1);
        assert_eq!(host.state.links_for(17)[0].text, "Text foo");
    }

    assert_eq!(backend.stored_links(17).len(), 1);

    // fresh session against the same backend: the store survives
    let (mut host, _main_id) = new_host(backend.clone());
    assert!(host.state.links_for(17).is_empty());

    host.process_message(Message::OpenDocument { document_id: 17 });
    drain(&mut host).await;

    let links = host.state.links_for(17);
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].text, "Text foo");

    // clicking the stored link opens the popup with documentId + params
    host.process_message(Message::OpenDetailPopup {
        document_id: 17,
        url: "https://plugin.example/detail?foo=foo".to_string(),
    });
    let popup = host
        .state
        .views()
        .find(|v| v.placement == Placement::DocumentDetailPopup)
        .expect("popup created");
    let query = popup.frame_url.query().unwrap();
    assert!(query.starts_with("documentId=17"));
    assert!(query.contains("foo=foo"));
}

#[tokio::test]
async fn test_right_pane_survives_toggles_until_destroyed() {
    let (mut host, main_id) = new_host(ScriptedBackend::default());

    let body = format!(
        r#"{{"sourceViewId":{main_id},"type":"setRightPane","url":"https://plugin.example/pane"}}"#
    );
    frame(&mut host, main_id, body.clone());
    assert_eq!(host.state.pane.state_label(), "split-active-right");
    let pane_id = host.state.pane.right_pane_view.unwrap();

    // repeated calls do not create a second frame
    frame(&mut host, main_id, body);
    assert_eq!(host.state.pane.right_pane_view, Some(pane_id));

    host.process_message(Message::ActivatePane {
        side: viewhost_core::PaneSide::Left,
    });
    assert_eq!(host.state.pane.state_label(), "split-active-left");
    assert!(host.state.is_registered(pane_id));

    host.process_message(Message::CloseRightPane);
    assert_eq!(host.state.pane.state_label(), "single");
    assert!(!host.state.is_registered(pane_id));
}
