//! HTTP client for the external filter/link backend
//!
//! The backend serves filtered document lists
//! (`GET /filter/{documentSetId}`) and persists document-detail links
//! (`POST /links`, `GET /links/{documentId}`). Controllers talk to it
//! through the [`DocumentBackend`] trait so tests can substitute a scripted
//! in-memory implementation.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use viewhost_core::prelude::*;
use viewhost_core::{
    ApiToken, Document, DocumentDetailLink, DocumentId, DocumentSetId, FilterOperation,
};

/// Default backend request timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// One filter application, as sent to the backend.
///
/// An empty `ids` set requests the unfiltered default list; the query then
/// omits `ids` and `operation` entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterRequest {
    pub document_set_id: DocumentSetId,
    pub api_token: ApiToken,
    pub ids: Vec<String>,
    pub operation: FilterOperation,
}

impl FilterRequest {
    /// Request the unfiltered default list
    pub fn unfiltered(document_set_id: DocumentSetId, api_token: ApiToken) -> Self {
        Self {
            document_set_id,
            api_token,
            ids: Vec::new(),
            operation: FilterOperation::default(),
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.ids.is_empty()
    }
}

/// External document backend operations
///
/// Both the host engine and tests use this trait.
#[trait_variant::make(DocumentBackend: Send)]
pub trait LocalDocumentBackend {
    /// Fetch the document list for a filter application
    async fn fetch_documents(&self, request: &FilterRequest) -> Result<Vec<Document>>;

    /// Persist one document-detail link. Idempotent under duplicate `url`.
    async fn persist_link(
        &self,
        document_id: DocumentId,
        link: &DocumentDetailLink,
        token: &ApiToken,
    ) -> Result<()>;

    /// Load the persisted link set for a document
    async fn fetch_links(
        &self,
        document_id: DocumentId,
        token: &ApiToken,
    ) -> Result<Vec<DocumentDetailLink>>;
}

#[derive(Debug, Deserialize)]
struct DocumentListResponse {
    documents: Vec<Document>,
}

#[derive(Debug, Deserialize)]
struct LinkListResponse {
    links: Vec<DocumentDetailLink>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistLinkBody<'a> {
    document_id: DocumentId,
    url: &'a str,
    text: &'a str,
}

/// Implementation against the real HTTP backend
#[derive(Debug, Clone)]
pub struct HttpDocumentBackend {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpDocumentBackend {
    /// Create a client for the backend at `base_url`
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::backend(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { base_url, http })
    }

    /// `GET /filter/{documentSetId}?apiToken=…[&ids=…&operation=…]`
    fn filter_url(&self, request: &FilterRequest) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::backend("backend base URL cannot be a base"))?
            .pop_if_empty()
            .extend(["filter", &request.document_set_id.to_string()]);

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("apiToken", request.api_token.as_str());
            if !request.is_unfiltered() {
                pairs.append_pair("ids", &request.ids.join(","));
                pairs.append_pair("operation", request.operation.as_str());
            }
        }

        Ok(url)
    }

    /// `POST /links?apiToken=…`
    fn persist_link_url(&self, token: &ApiToken) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::backend("backend base URL cannot be a base"))?
            .pop_if_empty()
            .push("links");
        url.query_pairs_mut()
            .append_pair("apiToken", token.as_str());
        Ok(url)
    }

    /// `GET /links/{documentId}?apiToken=…`
    fn fetch_links_url(&self, document_id: DocumentId, token: &ApiToken) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::backend("backend base URL cannot be a base"))?
            .pop_if_empty()
            .extend(["links", &document_id.to_string()]);
        url.query_pairs_mut()
            .append_pair("apiToken", token.as_str());
        Ok(url)
    }
}

impl DocumentBackend for HttpDocumentBackend {
    async fn fetch_documents(&self, request: &FilterRequest) -> Result<Vec<Document>> {
        let url = self.filter_url(request)?;
        debug!("Fetching document list: {url}");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::backend(format!("filter request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::backend_status(status.as_u16(), body));
        }

        let list: DocumentListResponse = response
            .json()
            .await
            .map_err(|e| Error::backend(format!("filter response decode failed: {e}")))?;
        Ok(list.documents)
    }

    async fn persist_link(
        &self,
        document_id: DocumentId,
        link: &DocumentDetailLink,
        token: &ApiToken,
    ) -> Result<()> {
        let url = self.persist_link_url(token)?;
        let body = PersistLinkBody {
            document_id,
            url: &link.url,
            text: &link.text,
        };

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::backend(format!("link persist failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::backend_status(status.as_u16(), body));
        }

        Ok(())
    }

    async fn fetch_links(
        &self,
        document_id: DocumentId,
        token: &ApiToken,
    ) -> Result<Vec<DocumentDetailLink>> {
        let url = self.fetch_links_url(document_id, token)?;
        debug!("Loading link store: {url}");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::backend(format!("link load failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::backend_status(status.as_u16(), body));
        }

        let list: LinkListResponse = response
            .json()
            .await
            .map_err(|e| Error::backend(format!("link response decode failed: {e}")))?;
        Ok(list.links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> HttpDocumentBackend {
        HttpDocumentBackend::new(
            Url::parse("http://backend.example:3333").unwrap(),
            Duration::from_millis(DEFAULT_TIMEOUT_MS),
        )
        .unwrap()
    }

    fn request(ids: &[&str], operation: FilterOperation) -> FilterRequest {
        FilterRequest {
            document_set_id: 1010101,
            api_token: ApiToken::new("tok123"),
            ids: ids.iter().map(|s| s.to_string()).collect(),
            operation,
        }
    }

    #[test]
    fn test_filter_url_with_selection() {
        let url = backend()
            .filter_url(&request(&["foo"], FilterOperation::Any))
            .unwrap();
        assert_eq!(url.path(), "/filter/1010101");
        assert_eq!(url.query().unwrap(), "apiToken=tok123&ids=foo&operation=any");
    }

    #[test]
    fn test_filter_url_joins_ids_with_commas() {
        let url = backend()
            .filter_url(&request(&["foo", "bar"], FilterOperation::All))
            .unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("ids".to_string(), "foo,bar".to_string())));
        assert!(pairs.contains(&("operation".to_string(), "all".to_string())));
    }

    #[test]
    fn test_filter_url_empty_selection_omits_ids_and_operation() {
        let url = backend()
            .filter_url(&FilterRequest::unfiltered(1010101, ApiToken::new("tok123")))
            .unwrap();
        assert_eq!(url.query().unwrap(), "apiToken=tok123");
    }

    #[test]
    fn test_filter_url_with_trailing_slash_base() {
        let backend = HttpDocumentBackend::new(
            Url::parse("http://backend.example:3333/").unwrap(),
            Duration::from_secs(1),
        )
        .unwrap();
        let url = backend
            .filter_url(&request(&["foo"], FilterOperation::Any))
            .unwrap();
        assert_eq!(url.path(), "/filter/1010101");
    }

    #[test]
    fn test_links_urls() {
        let b = backend();
        let token = ApiToken::new("tok123");
        assert_eq!(
            b.fetch_links_url(17, &token).unwrap().as_str(),
            "http://backend.example:3333/links/17?apiToken=tok123"
        );
        assert_eq!(
            b.persist_link_url(&token).unwrap().as_str(),
            "http://backend.example:3333/links?apiToken=tok123"
        );
    }

    #[test]
    fn test_persist_body_wire_format() {
        let body = PersistLinkBody {
            document_id: 17,
            url: "https://plugin.example/detail?foo=foo",
            text: "Text foo",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["documentId"], 17);
        assert_eq!(json["url"], "https://plugin.example/detail?foo=foo");
        assert_eq!(json["text"], "Text foo");
    }

    #[test]
    fn test_unfiltered_request_helper() {
        let req = FilterRequest::unfiltered(7, ApiToken::new("t"));
        assert!(req.is_unfiltered());
        assert_eq!(req.operation, FilterOperation::Any);
    }
}
