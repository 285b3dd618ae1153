use async_trait::async_trait;
use reqwest::{Request, Response};

/// The HTTP seam [`HttpSheetSource`](crate::sheets::HttpSheetSource) goes
/// through; swap the client here to decorate or stub the transport.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
