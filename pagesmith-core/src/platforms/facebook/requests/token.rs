use serde::Deserialize;

use crate::platforms::facebook::client::FacebookClient;
use crate::platforms::facebook::requests::into_json;
use crate::Error;

#[derive(Debug, Deserialize)]
pub struct LongLivedToken {
    pub access_token: String,
}

/// Exchange a short-lived user or page token for a long-lived one.
pub async fn exchange_token(
    client: &FacebookClient,
    app_id: &str,
    app_secret: &str,
    short_lived_token: &str,
) -> Result<LongLivedToken, Error> {
    let url = client.url("oauth/access_token");
    let response = client
        .http()
        .get(&url)
        .query(&[
            ("grant_type", "fb_exchange_token"),
            ("client_id", app_id),
            ("client_secret", app_secret),
            ("fb_exchange_token", short_lived_token),
        ])
        .send()
        .await?;
    let value = into_json(response).await?;
    Ok(serde_json::from_value(value)?)
}
