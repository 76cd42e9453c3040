//! viewhost-plugin - The plugin-facing boundary of the view host
//!
//! Everything that touches the outside of the host lives here:
//! - `protocol`: parsing inbound frame messages against the closed command set
//! - `frame_url`: api-token issuance and frame source URL construction
//! - `backend`: the HTTP client for the external filter/link backend

pub mod backend;
pub mod frame_url;
pub mod protocol;

pub use backend::{DocumentBackend, FilterRequest, HttpDocumentBackend, DEFAULT_TIMEOUT_MS};
pub use frame_url::{frame_url, generate_api_token, popup_url};
pub use protocol::parse_frame_message;
