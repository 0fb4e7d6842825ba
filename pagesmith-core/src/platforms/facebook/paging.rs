use serde::Deserialize;
use serde_json::Value;

use crate::Error;

/// Bound on a runaway `paging.next` chain from a misbehaving upstream.
const MAX_PAGES: usize = 50;

#[derive(Debug, Deserialize)]
struct PagedResponse {
    #[serde(default)]
    data: Vec<Value>,
    paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
struct Paging {
    next: Option<String>,
}

/// Follow a paginated Graph collection to exhaustion, accumulating every
/// page's `data` array in page order.
///
/// The first request carries `params`; each `paging.next` URL already embeds
/// the cursor and all parameters, so it is followed verbatim. Any non-success
/// response aborts the whole fetch with `Error::Upstream`; partial results
/// are discarded, never returned.
pub async fn fetch_all_pages(
    http: &reqwest::Client,
    initial_url: &str,
    params: &[(&str, String)],
) -> Result<Vec<Value>, Error> {
    let mut all_data = Vec::new();
    let mut next_url: Option<String> = None;

    for _ in 0..MAX_PAGES {
        let request = match &next_url {
            Some(url) => http.get(url),
            None => http.get(initial_url).query(params),
        };
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let page: PagedResponse = response.json().await?;
        all_data.extend(page.data);

        match page.paging.and_then(|p| p.next) {
            Some(next) => next_url = Some(next),
            None => return Ok(all_data),
        }
    }

    Err(Error::Platform(format!(
        "paginated fetch exceeded {} pages; aborting",
        MAX_PAGES
    )))
}
