//! Frame source URL construction and api-token issuance
//!
//! The query-parameter order of a frame URL is part of the compatibility
//! contract with plugins: `server`, `documentSetId`, `apiToken`, then the
//! optional `placement`.

use rand::Rng;
use url::Url;

use viewhost_core::prelude::*;
use viewhost_core::{ApiToken, DocumentId, DocumentSetId, Placement};

/// Length of generated api tokens
const TOKEN_LEN: usize = 32;

/// Token alphabet: lowercase alphanumeric only
const TOKEN_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Issue a fresh opaque api token.
///
/// Tokens are issued per view and never reused across document sets; the
/// caller is responsible for generating a new one for every view it creates.
pub fn generate_api_token() -> ApiToken {
    let mut rng = rand::thread_rng();
    let token: String = (0..TOKEN_LEN)
        .map(|_| TOKEN_CHARSET[rng.gen_range(0..TOKEN_CHARSET.len())] as char)
        .collect();
    ApiToken::new(token)
}

/// Build the frame source URL for a view.
///
/// Replaces any query string the plugin URL carried with exactly, in order:
/// `server=<host origin>`, `documentSetId=<id>`, `apiToken=<token>`, and
/// `placement=right-pane` for right-pane placements only.
pub fn frame_url(
    plugin_url: &Url,
    server_origin: &Url,
    document_set_id: DocumentSetId,
    token: &ApiToken,
    placement: Placement,
) -> Url {
    let mut url = plugin_url.clone();
    url.set_query(None);
    url.set_fragment(None);

    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("server", &server_origin.origin().ascii_serialization());
        pairs.append_pair("documentSetId", &document_set_id.to_string());
        pairs.append_pair("apiToken", token.as_str());
        if placement == Placement::RightPane {
            pairs.append_pair("placement", placement.as_query_value());
        }
    }

    url
}

/// Build the frame URL for a document-detail popup.
///
/// The popup loads the link's URL with `documentId=<id>` first, followed by
/// every query parameter the plugin declared on the link, preserved in order.
pub fn popup_url(link_url: &str, document_id: DocumentId) -> Result<Url> {
    let parsed = Url::parse(link_url)?;
    let declared: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut url = parsed;
    url.set_query(None);

    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("documentId", &document_id.to_string());
        for (key, value) in &declared {
            pairs.append_pair(key, value);
        }
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plugin_url() -> Url {
        Url::parse("https://plugin.example/show").unwrap()
    }

    fn server_origin() -> Url {
        Url::parse("http://localhost:9000").unwrap()
    }

    #[test]
    fn test_token_is_lowercase_alphanumeric() {
        let token = generate_api_token();
        assert_eq!(token.as_str().len(), TOKEN_LEN);
        assert!(token
            .as_str()
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_api_token();
        let b = generate_api_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_frame_url_query_order() {
        let token = ApiToken::new("abc123");
        let url = frame_url(&plugin_url(), &server_origin(), 42, &token, Placement::Main);
        assert_eq!(
            url.query().unwrap(),
            "server=http%3A%2F%2Flocalhost%3A9000&documentSetId=42&apiToken=abc123"
        );
    }

    #[test]
    fn test_frame_url_round_trips_issuing_values() {
        let token = generate_api_token();
        let url = frame_url(
            &plugin_url(),
            &server_origin(),
            1010101,
            &token,
            Placement::Main,
        );

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("server".to_string(), "http://localhost:9000".to_string()),
                ("documentSetId".to_string(), "1010101".to_string()),
                ("apiToken".to_string(), token.as_str().to_string()),
            ]
        );
    }

    #[test]
    fn test_right_pane_gets_placement_param() {
        let token = ApiToken::new("tok");
        let url = frame_url(
            &plugin_url(),
            &server_origin(),
            42,
            &token,
            Placement::RightPane,
        );
        assert!(url.query().unwrap().ends_with("&placement=right-pane"));
    }

    #[test]
    fn test_modal_gets_no_placement_param() {
        let token = ApiToken::new("tok");
        let url = frame_url(&plugin_url(), &server_origin(), 42, &token, Placement::Modal);
        assert!(!url.query().unwrap().contains("placement"));
    }

    #[test]
    fn test_frame_url_replaces_existing_query() {
        let dirty = Url::parse("https://plugin.example/show?stale=1#frag").unwrap();
        let token = ApiToken::new("tok");
        let url = frame_url(&dirty, &server_origin(), 42, &token, Placement::Main);
        assert!(!url.query().unwrap().contains("stale"));
        assert!(url.fragment().is_none());
    }

    #[test]
    fn test_popup_url_carries_document_id_and_declared_params() {
        let url = popup_url("https://plugin.example/detail?foo=foo&bar=2", 17).unwrap();
        assert_eq!(url.query().unwrap(), "documentId=17&foo=foo&bar=2");
    }

    #[test]
    fn test_popup_url_without_declared_params() {
        let url = popup_url("https://plugin.example/detail", 17).unwrap();
        assert_eq!(url.query().unwrap(), "documentId=17");
    }

    #[test]
    fn test_popup_url_rejects_invalid_link() {
        assert!(popup_url("::not a url::", 17).is_err());
    }
}
