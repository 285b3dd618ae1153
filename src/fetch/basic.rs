use super::client::HttpClient;
use async_trait::async_trait;

/// Plain [`HttpClient`] over a shared `reqwest::Client`. Published sheet
/// CSV endpoints are unauthenticated, so no request decoration is needed.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        Self(reqwest::Client::new())
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}
