use reqwest::Client;

/// Stateless Graph API client: one shared HTTP client plus the versioned
/// base URL. Credentials travel per call; nothing is cached here.
#[derive(Clone)]
pub struct FacebookClient {
    http: Client,
    base_url: String,
}

impl FacebookClient {
    pub fn new(graph_api_version: &str) -> Self {
        Self::with_base_url(format!("https://graph.facebook.com/{}", graph_api_version))
    }

    /// Point the client at a different host. Used by tests to talk to a
    /// local stub upstream.
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }
}
