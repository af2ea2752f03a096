use crate::domain_model::*;
use crate::domain_port::*;
use std::time::Duration;
use url::Url;

pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        // so that joining keeps the last path segment
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(ReqwestTransport { client, base_url })
    }

    /// `scheme://host[:port]`, the key durable token storage is partitioned by.
    pub fn origin(&self) -> String {
        self.base_url.origin().ascii_serialization()
    }

    fn url(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: &ApiRequest,
        bearer: Option<&AccessToken>,
    ) -> Result<ApiResponse, TransportError> {
        let url = self.url(&request.path)?;
        let mut builder = self.client.request(request.method.clone(), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(&token.0);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        tracing::trace!(method = %request.method, path = %request.path, %status, "response");
        Ok(ApiResponse::new(status, body))
    }
}
