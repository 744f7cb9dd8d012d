use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use url::Url;

use crate::error::RelayError;
use crate::models::chat::{ RelayRequest, RelayResponse };

/// The widget's only way out: one call to the relay endpoint.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn send(&self, request: &RelayRequest) -> Result<RelayResponse, RelayError>;
}

pub struct HttpRelayTransport {
    http: HttpClient,
    url: Url,
}

impl HttpRelayTransport {
    /// `base` is the relay origin, `endpoint` the chat route (absolute or relative).
    pub fn new(base: &str, endpoint: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(base)?.join(endpoint)?;
        Ok(Self { http: HttpClient::new(), url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl RelayTransport for HttpRelayTransport {
    async fn send(&self, request: &RelayRequest) -> Result<RelayResponse, RelayError> {
        debug!("POST {} with {} turns", self.url, request.messages.len());
        let resp = self.http
            .post(self.url.clone())
            .json(request)
            .send().await?
            .error_for_status()?;
        Ok(resp.json::<RelayResponse>().await?)
    }
}
