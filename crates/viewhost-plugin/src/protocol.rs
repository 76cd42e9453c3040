//! Wire-format handling for inbound plugin frame messages

use viewhost_core::MessageEnvelope;

/// Parses one inbound frame message against the closed command enumeration.
///
/// Frames ship messages as single-line JSON. Anything that does not parse
/// as a [`MessageEnvelope`] -- bad JSON, unknown `type`, missing fields --
/// is a protocol error: the message is dropped and logged, never surfaced
/// to the plugin or the user.
///
/// # Arguments
/// * `line` - Raw message body as received from the frame transport
///
/// # Returns
/// * `Some(MessageEnvelope)` if the message parses against the command set
/// * `None` if parsing fails
pub fn parse_frame_message(line: &str) -> Option<MessageEnvelope> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<MessageEnvelope>(trimmed) {
        Ok(envelope) => Some(envelope),
        Err(err) => {
            tracing::warn!("Dropping unparseable frame message: {err}");
            None
        }
    }
}
