use serde_json::Value;

use crate::platforms::facebook::client::FacebookClient;
use crate::platforms::facebook::requests::into_json;
use crate::Error;

/// Post a reply to a comment on a page post. Returns the id of the reply
/// comment.
pub async fn reply_to_comment(
    client: &FacebookClient,
    comment_id: &str,
    access_token: &str,
    reply: &str,
) -> Result<Value, Error> {
    let url = client.url(&format!("{}/comments", comment_id));
    let response = client
        .http()
        .post(&url)
        .form(&[("message", reply), ("access_token", access_token)])
        .send()
        .await?;
    into_json(response).await
}
