use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::platforms::facebook::client::FacebookClient;
use crate::platforms::facebook::requests::into_json;
use crate::Error;

const PAGE_INFO_FIELDS: &str = "id,name,about,description,category,category_list,website";
const SEARCH_FIELDS: &str = "id,name,category";

/// Public page metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_list: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// One competitor page hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSummary {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<PageSummary>,
}

/// Fetch a page's public metadata.
pub async fn page_info(
    client: &FacebookClient,
    page_id: &str,
    access_token: &str,
) -> Result<PageInfo, Error> {
    let url = client.url(page_id);
    let response = client
        .http()
        .get(&url)
        .query(&[("fields", PAGE_INFO_FIELDS), ("access_token", access_token)])
        .send()
        .await?;
    let value = into_json(response).await?;
    Ok(serde_json::from_value(value)?)
}

/// Search for competitor pages by keyword.
pub async fn search_pages(
    client: &FacebookClient,
    keywords: &[String],
    access_token: &str,
    limit: u32,
) -> Result<Vec<PageSummary>, Error> {
    let url = client.url("search");
    let response = client
        .http()
        .get(&url)
        .query(&[
            ("type", "page".to_string()),
            ("q", keywords.join(" ")),
            ("fields", SEARCH_FIELDS.to_string()),
            ("limit", limit.to_string()),
            ("access_token", access_token.to_string()),
        ])
        .send()
        .await?;
    let value = into_json(response).await?;
    let parsed: SearchResponse = serde_json::from_value(value)?;
    Ok(parsed.data)
}
