use reqwest::{
    header::{ACCEPT, CONTENT_TYPE},
    Client,
};
use serde_json::Value;
use url::Url;

use super::{RelyingPartyTransport, TransportError, TransportResponse, JSON_ACCEPT, JSON_CONTENT_TYPE};

#[async_trait::async_trait]
impl RelyingPartyTransport for Client {
    async fn post_json(&self, url: &Url, body: &Value) -> Result<TransportResponse, TransportError> {
        let body = serde_json::to_vec(body).map_err(|e| TransportError::InvalidJson(e.to_string()))?;

        let response = self
            .post(url.clone())
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(ACCEPT, JSON_ACCEPT)
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        log::debug!("POST {url} answered {status}");

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}
