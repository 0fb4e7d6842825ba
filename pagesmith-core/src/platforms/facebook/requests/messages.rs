// ========================================================
// File: pagesmith-core/src/platforms/facebook/requests/messages.rs
// ========================================================
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::platforms::facebook::client::FacebookClient;
use crate::platforms::facebook::paging::fetch_all_pages;
use crate::platforms::facebook::requests::into_json;
use crate::Error;

const CONVERSATION_FIELDS: &str = "participants,messages{from,message,created_time}";
const CHAT_FIELDS: &str = "message,from,to,created_time";

#[derive(Debug, Deserialize)]
struct RawParticipant {
    id: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRecipients {
    #[serde(default)]
    data: Vec<RawParticipant>,
}

#[derive(Debug, Deserialize)]
struct RawChatMessage {
    from: Option<RawParticipant>,
    to: Option<RawRecipients>,
    message: Option<String>,
    created_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatHistoryResponse {
    #[serde(default)]
    data: Vec<RawChatMessage>,
}

/// One Messenger message, flattened for readability.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub sender_id: String,
    pub sender_name: String,
    pub recipient_id: Option<String>,
    pub message: Option<String>,
    pub created_time: Option<String>,
}

/// Send a reply to a user's Messenger message via the Send API.
pub async fn reply_to_message(
    client: &FacebookClient,
    page_id: &str,
    access_token: &str,
    psid: &str,
    text: &str,
    messaging_type: &str,
) -> Result<Value, Error> {
    let url = client.url(&format!("{}/messages", page_id));
    let payload = json!({
        "recipient": { "id": psid },
        "message": { "text": text },
        "messaging_type": messaging_type,
    });
    let response = client
        .http()
        .post(&url)
        .query(&[("access_token", access_token)])
        .json(&payload)
        .send()
        .await?;
    into_json(response).await
}

/// Fetch the message history of one conversation thread (single page).
pub async fn chat_history(
    client: &FacebookClient,
    chat_id: &str,
    access_token: &str,
) -> Result<Vec<ChatMessage>, Error> {
    let url = client.url(&format!("{}/messages", chat_id));
    let response = client
        .http()
        .get(&url)
        .query(&[("fields", CHAT_FIELDS), ("access_token", access_token)])
        .send()
        .await?;
    let value = into_json(response).await?;
    let parsed: ChatHistoryResponse = serde_json::from_value(value)?;

    let messages = parsed
        .data
        .into_iter()
        .map(|raw| {
            let (sender_id, sender_name) = match raw.from {
                Some(from) => (from.id, from.name.unwrap_or_else(|| "Unknown".to_string())),
                None => (String::new(), "Unknown".to_string()),
            };
            let recipient_id = raw
                .to
                .and_then(|to| to.data.into_iter().next())
                .map(|p| p.id);
            ChatMessage {
                sender_id,
                sender_name,
                recipient_id,
                message: raw.message,
                created_time: raw.created_time,
            }
        })
        .collect();
    Ok(messages)
}

/// Fetch every conversation thread of a page inbox, with participants and
/// messages, following pagination to exhaustion.
pub async fn page_conversations(
    client: &FacebookClient,
    page_id: &str,
    access_token: &str,
) -> Result<Vec<Value>, Error> {
    let url = client.url(&format!("{}/conversations", page_id));
    let params = [
        ("access_token", access_token.to_string()),
        ("fields", CONVERSATION_FIELDS.to_string()),
    ];
    fetch_all_pages(client.http(), &url, &params).await
}
