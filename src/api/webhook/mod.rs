//! Nextcloud Talk webhook endpoint
//!
//! Talk delivers every conversation message here. The handler verifies
//! the signature, filters out the bot's own messages, acknowledges
//! immediately and answers in a background task so the webhook delivery
//! never waits on retrieval or generation.

pub mod message;
pub mod signature;

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::{ChatClient, THINKING_MESSAGE};

pub use message::{clean_message, is_own_message, parse_webhook, IncomingMessage};
pub use signature::verify_signature;

const SIGNATURE_HEADER: &str = "x-nextcloud-talk-signature";
const RANDOM_HEADER: &str = "x-nextcloud-talk-random";

const SEND_FAILURE_APOLOGY: &str = "Sorry, I had trouble answering that. Try again!";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

pub async fn handle(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let signature = header_str(&headers, SIGNATURE_HEADER);
    let random = header_str(&headers, RANDOM_HEADER);

    if !verify_signature(state.webhook_secret.as_deref(), random, &body, signature) {
        warn!("Invalid webhook signature, rejecting request");
        return Err(ApiError::unauthorized("invalid webhook signature"));
    }

    let incoming = parse_webhook(&body).map_err(|e| ApiError::bad_request(e.to_string()))?;

    if is_own_message(&incoming.actor_id, &incoming.actor_name, &state.bot_name) {
        return Ok(Json(json!({"status": "ignored", "reason": "own message"})));
    }

    let query = clean_message(&incoming.message, &state.bot_name);
    if query.is_empty() {
        return Ok(Json(json!({"status": "ignored", "reason": "empty message"})));
    }

    let Some(chat) = state.chat.clone() else {
        return Err(ApiError::unavailable("chat platform not configured"));
    };

    info!(conversation = %incoming.conversation, "Webhook message accepted");

    // Answer in the background; the webhook response only acknowledges
    // receipt.
    tokio::spawn(process_and_respond(
        state.clone(),
        chat,
        incoming.conversation,
        query,
    ));

    Ok(Json(json!({"status": "success"})))
}

async fn process_and_respond(
    state: AppState,
    chat: Arc<dyn ChatClient>,
    conversation: String,
    query: String,
) {
    let thinking_id = match chat.send_message(&conversation, THINKING_MESSAGE).await {
        Ok(id) => id,
        Err(e) => {
            warn!(conversation, error = %e, "Could not post thinking message");
            None
        }
    };

    let (payload, _) = state.answer_with_persistence(&query).await;
    let formatted = payload.format_for_chat();

    if let Err(e) = chat.send_message(&conversation, &formatted).await {
        error!(conversation, error = %e, "Could not deliver answer");
        if let Err(e) = chat.send_message(&conversation, SEND_FAILURE_APOLOGY).await {
            error!(conversation, error = %e, "Could not deliver fallback either");
        }
    }

    if let Some(message_id) = thinking_id {
        if let Err(e) = chat.delete_message(&conversation, message_id).await {
            warn!(conversation, message_id, error = %e, "Could not delete thinking message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::test_support::{passage, state_with};
    use crate::domain::chat::mock::MockChatClient;
    use crate::domain::generation::mock::MockGenerator;
    use crate::domain::retrieval::mock::MockSearchGateway;
    use hmac::Mac;

    fn legacy_body(message: &str) -> Bytes {
        Bytes::from(
            json!({
                "message": message,
                "token": "room42",
                "actor_id": "users/alice",
                "actor_displayname": "Alice"
            })
            .to_string(),
        )
    }

    fn signed_headers(secret: &str, random: &str, body: &[u8]) -> HeaderMap {
        let mut mac =
            hmac::Hmac::<sha2::Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(random.as_bytes());
        mac.update(body);
        let signature = hex::encode(mac.finalize().into_bytes());

        let mut headers = HeaderMap::new();
        headers.insert(SIGNATURE_HEADER, signature.parse().unwrap());
        headers.insert(RANDOM_HEADER, random.parse().unwrap());
        headers
    }

    async fn wait_for_messages(chat: &MockChatClient, count: usize) {
        for _ in 0..100 {
            if chat.sent_messages().len() >= count {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }

    async fn wait_for_deletions(chat: &MockChatClient, count: usize) {
        for _ in 0..100 {
            if chat.deleted_messages().len() >= count {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }

    #[tokio::test]
    async fn test_webhook_answers_in_conversation() {
        let mut t = state_with(
            MockSearchGateway::new().with_results(vec![passage()]),
            MockGenerator::new("Two diamonds, one stick!"),
        );
        let chat = Arc::new(MockChatClient::new());
        t.state.chat = Some(chat.clone());

        let response = handle(State(t.state), HeaderMap::new(), legacy_body("how to craft a sword"))
            .await
            .unwrap();
        assert_eq!(response.0["status"], "success");

        wait_for_messages(&chat, 2).await;
        let sent = chat.sent_messages();
        assert_eq!(sent[0], ("room42".to_string(), THINKING_MESSAGE.to_string()));
        assert_eq!(sent[1].0, "room42");
        assert!(sent[1].1.starts_with("Two diamonds, one stick!"));
        assert!(sent[1].1.contains("**Sources:**"));

        // The thinking message was cleaned up.
        wait_for_deletions(&chat, 1).await;
        assert_eq!(chat.deleted_messages(), vec![("room42".to_string(), 0)]);
    }

    #[tokio::test]
    async fn test_webhook_rejects_bad_signature() {
        let mut t = state_with(MockSearchGateway::new(), MockGenerator::new("unused"));
        t.state.webhook_secret = Some("secret".to_string());
        t.state.chat = Some(Arc::new(MockChatClient::new()));

        let err = handle(State(t.state), HeaderMap::new(), legacy_body("q"))
            .await
            .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_webhook_accepts_valid_signature() {
        let mut t = state_with(
            MockSearchGateway::new().with_results(vec![passage()]),
            MockGenerator::new("answer"),
        );
        t.state.webhook_secret = Some("secret".to_string());
        let chat = Arc::new(MockChatClient::new());
        t.state.chat = Some(chat.clone());

        let body = legacy_body("how to craft a sword");
        let headers = signed_headers("secret", "random123", &body);

        let response = handle(State(t.state), headers, body).await.unwrap();
        assert_eq!(response.0["status"], "success");
    }

    #[tokio::test]
    async fn test_webhook_ignores_own_messages() {
        let mut t = state_with(MockSearchGateway::new(), MockGenerator::new("unused"));
        let chat = Arc::new(MockChatClient::new());
        t.state.chat = Some(chat.clone());

        let body = Bytes::from(
            json!({
                "message": "echo",
                "token": "room42",
                "actor_id": "bots/Minecraft Bot",
                "actor_displayname": "Minecraft Bot"
            })
            .to_string(),
        );

        let response = handle(State(t.state), HeaderMap::new(), body).await.unwrap();
        assert_eq!(response.0["status"], "ignored");
        assert!(chat.sent_messages().is_empty());
    }

    #[tokio::test]
    async fn test_webhook_ignores_empty_after_cleaning() {
        let mut t = state_with(MockSearchGateway::new(), MockGenerator::new("unused"));
        t.state.chat = Some(Arc::new(MockChatClient::new()));

        let response = handle(
            State(t.state),
            HeaderMap::new(),
            legacy_body("@Minecraft Bot"),
        )
        .await
        .unwrap();
        assert_eq!(response.0["status"], "ignored");
    }

    #[tokio::test]
    async fn test_webhook_without_chat_client() {
        let t = state_with(MockSearchGateway::new(), MockGenerator::new("unused"));

        let err = handle(State(t.state), HeaderMap::new(), legacy_body("q"))
            .await
            .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_webhook_malformed_body() {
        let mut t = state_with(MockSearchGateway::new(), MockGenerator::new("unused"));
        t.state.chat = Some(Arc::new(MockChatClient::new()));

        let err = handle(State(t.state), HeaderMap::new(), Bytes::from_static(b"not json"))
            .await
            .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }
}
