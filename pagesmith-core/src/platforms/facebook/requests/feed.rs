// ========================================================
// File: pagesmith-core/src/platforms/facebook/requests/feed.rs
// ========================================================
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::platforms::facebook::client::FacebookClient;
use crate::platforms::facebook::paging::fetch_all_pages;
use crate::platforms::facebook::requests::into_json;
use crate::Error;

/// Field selection for feed interactions: posts with their comments and
/// reactions.
const FEED_FIELDS: &str =
    "id,message,created_time,comments{from,id,message,created_time},reactions{type,id,name}";

/// Response from publishing to a page feed; the id is `<PAGEID_POSTID>`.
#[derive(Debug, Deserialize)]
pub struct PublishedPost {
    pub id: String,
}

/// Partial edit of an existing page post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostEdit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Publish a new post to a page feed.
pub async fn publish_post(
    client: &FacebookClient,
    page_id: &str,
    access_token: &str,
    message: &str,
) -> Result<PublishedPost, Error> {
    let url = client.url(&format!("{}/feed", page_id));
    let response = client
        .http()
        .post(&url)
        .form(&[("message", message), ("access_token", access_token)])
        .send()
        .await?;
    let value = into_json(response).await?;
    Ok(serde_json::from_value(value)?)
}

/// Apply a partial edit to an existing post. The upstream confirms with
/// `{"success": true}`; anything else is an error.
pub async fn update_post(
    client: &FacebookClient,
    post_id: &str,
    access_token: &str,
    edit: &PostEdit,
) -> Result<(), Error> {
    let mut form: Vec<(&str, String)> = Vec::new();
    if let Some(message) = &edit.message {
        form.push(("message", message.clone()));
    }
    if let Some(link) = &edit.link {
        form.push(("link", link.clone()));
    }
    form.push(("access_token", access_token.to_string()));

    let url = client.url(post_id);
    let response = client.http().post(&url).form(&form).send().await?;
    let value = into_json(response).await?;
    if value.get("success").and_then(Value::as_bool) != Some(true) {
        return Err(Error::Platform(format!(
            "post update not confirmed by upstream: {}",
            value
        )));
    }
    Ok(())
}

/// Fetch every post on the page feed, comments and reactions included,
/// following pagination to exhaustion.
pub async fn page_feed(
    client: &FacebookClient,
    page_id: &str,
    access_token: &str,
) -> Result<Vec<Value>, Error> {
    let url = client.url(&format!("{}/posts", page_id));
    let params = [
        ("access_token", access_token.to_string()),
        ("fields", FEED_FIELDS.to_string()),
    ];
    fetch_all_pages(client.http(), &url, &params).await
}
