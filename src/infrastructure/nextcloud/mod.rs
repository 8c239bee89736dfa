//! Nextcloud Talk chat client (OCS bot API)

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::domain::{ChatClient, DomainError};

const OCS_TIMEOUT: Duration = Duration::from_secs(10);

/// Talk client authenticating with a bot token against the OCS bot API.
#[derive(Debug, Clone)]
pub struct NextcloudTalkClient {
    client: reqwest::Client,
    base_url: String,
    bot_token: String,
}

impl NextcloudTalkClient {
    pub fn new(base_url: impl Into<String>, bot_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(OCS_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
        }
    }

    fn chat_url(&self, conversation: &str) -> String {
        format!(
            "{}/ocs/v2.php/apps/spreed/api/v1/bot/{}/message",
            self.base_url, conversation
        )
    }
}

#[async_trait]
impl ChatClient for NextcloudTalkClient {
    async fn send_message(
        &self,
        conversation: &str,
        message: &str,
    ) -> Result<Option<i64>, DomainError> {
        let response = self
            .client
            .post(self.chat_url(conversation))
            .header("OCS-APIRequest", "true")
            .header("Accept", "application/json")
            .bearer_auth(&self.bot_token)
            .json(&json!({"message": message}))
            .send()
            .await
            .map_err(|e| DomainError::chat(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::chat(format!("HTTP {status}: {body}")));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| DomainError::chat(format!("malformed OCS response: {e}")))?;

        let message_id = body
            .pointer("/ocs/data/id")
            .and_then(serde_json::Value::as_i64);

        debug!(conversation, ?message_id, "Message posted");
        Ok(message_id)
    }

    async fn delete_message(
        &self,
        conversation: &str,
        message_id: i64,
    ) -> Result<(), DomainError> {
        let url = format!("{}/{}", self.chat_url(conversation), message_id);

        let response = self
            .client
            .delete(url)
            .header("OCS-APIRequest", "true")
            .header("Accept", "application/json")
            .bearer_auth(&self.bot_token)
            .send()
            .await
            .map_err(|e| DomainError::chat(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::chat(format!("HTTP {status}: {body}")));
        }

        debug!(conversation, message_id, "Message deleted");
        Ok(())
    }
}
