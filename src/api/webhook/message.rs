//! Incoming chat message parsing and cleanup

use serde_json::Value;

use crate::domain::DomainError;

/// A chat message extracted from a webhook delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingMessage {
    pub message: String,
    /// Conversation token to reply into.
    pub conversation: String,
    pub actor_id: String,
    pub actor_name: String,
}

/// Parse a webhook body in either the ActivityPub shape Talk sends today
/// (`object.content` holds a stringified JSON document) or the legacy
/// flat shape.
pub fn parse_webhook(body: &[u8]) -> Result<IncomingMessage, DomainError> {
    let data: Value = serde_json::from_slice(body)
        .map_err(|e| DomainError::chat(format!("invalid webhook JSON: {e}")))?;

    if let Some(content_str) = data.pointer("/object/content").and_then(Value::as_str) {
        let content: Value = serde_json::from_str(content_str)
            .map_err(|e| DomainError::chat(format!("invalid message content: {e}")))?;

        let conversation = data
            .pointer("/target/id")
            .and_then(Value::as_str)
            .ok_or_else(|| DomainError::chat("missing conversation token"))?;

        return Ok(IncomingMessage {
            message: content
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            conversation: conversation.to_string(),
            actor_id: data
                .pointer("/actor/id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            actor_name: data
                .pointer("/actor/name")
                .and_then(Value::as_str)
                .unwrap_or("User")
                .to_string(),
        });
    }

    let message = data
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| DomainError::chat("missing required fields"))?;
    let conversation = data
        .get("token")
        .and_then(Value::as_str)
        .ok_or_else(|| DomainError::chat("missing required fields"))?;

    Ok(IncomingMessage {
        message: message.to_string(),
        conversation: conversation.to_string(),
        actor_id: data
            .get("actor_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        actor_name: data
            .get("actor_displayname")
            .and_then(Value::as_str)
            .unwrap_or("User")
            .to_string(),
    })
}

/// Whether a message came from the bot itself, to break reply loops.
pub fn is_own_message(actor_id: &str, actor_name: &str, bot_name: &str) -> bool {
    let bot_lower = bot_name.to_lowercase();
    actor_name.to_lowercase() == bot_lower || actor_id.to_lowercase().ends_with(&bot_lower)
}

/// Strip bot mentions and greeting prefixes from a message, leaving the
/// question itself.
pub fn clean_message(message: &str, bot_name: &str) -> String {
    let mut cleaned = message
        .replace(&format!("@{bot_name}"), "")
        .replace(&format!("@{}", bot_name.to_lowercase()), "")
        .trim()
        .to_string();

    for prefix in ["hey", "hi", "hello", "bot"] {
        let boundary = prefix.len() + 1;
        // The space byte guarantees both slice points are char boundaries.
        if cleaned.len() > boundary
            && cleaned.as_bytes()[prefix.len()] == b' '
            && cleaned[..prefix.len()].eq_ignore_ascii_case(prefix)
        {
            cleaned = cleaned[boundary..].trim().to_string();
            break;
        }
    }

    cleaned
}
