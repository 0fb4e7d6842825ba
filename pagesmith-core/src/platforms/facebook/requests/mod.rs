use serde_json::Value;

use crate::Error;

pub mod comments;
pub mod feed;
pub mod messages;
pub mod pages;
pub mod token;

/// Read a Graph response body, surfacing any failure as `Error::Upstream`
/// carrying the upstream status and body. Some Graph endpoints report
/// failures inside a 200 body under an `error` key; those count too.
pub(crate) async fn into_json(response: reqwest::Response) -> Result<Value, Error> {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if !status.is_success() {
        return Err(Error::Upstream {
            status: status.as_u16(),
            body,
        });
    }
    let value: Value = serde_json::from_str(&body)?;
    if value.get("error").is_some() {
        return Err(Error::Upstream {
            status: status.as_u16(),
            body,
        });
    }
    Ok(value)
}
