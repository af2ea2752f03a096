#![allow(dead_code)]

use parking_lot::Mutex;
use reqwest::StatusCode;
use stanceline::application_impl::*;
use stanceline::domain_model::*;
use stanceline::domain_port::*;
use stanceline::infra::MemoryTokenStorage;
use std::sync::Arc;
use std::time::Duration;

type Handler =
    dyn Fn(&ApiRequest, Option<&AccessToken>) -> Result<ApiResponse, TransportError> + Send + Sync;

/// What the fake server saw.
#[derive(Debug, Clone)]
pub struct Call {
    pub path: String,
    pub bearer: Option<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl Call {
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// In-process stand-in for the backend: records every call, optionally
/// stalls some paths, then answers through `handler`.
pub struct ScriptedTransport {
    handler: Box<Handler>,
    delays: Vec<(String, Duration)>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&ApiRequest, Option<&AccessToken>) -> Result<ApiResponse, TransportError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            handler: Box::new(handler),
            delays: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, path: &str, delay: Duration) -> Self {
        self.delays.push((path.to_owned(), delay));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<Call> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.path == path)
            .cloned()
            .collect()
    }

    pub fn count(&self, path: &str) -> usize {
        self.calls_to(path).len()
    }
}

#[async_trait::async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(
        &self,
        request: &ApiRequest,
        bearer: Option<&AccessToken>,
    ) -> Result<ApiResponse, TransportError> {
        self.calls.lock().push(Call {
            path: request.path.clone(),
            bearer: bearer.map(|t| t.0.clone()),
            query: request.query.clone(),
            body: request.body.clone(),
        });
        let delay = self
            .delays
            .iter()
            .find(|(path, _)| *path == request.path)
            .map(|(_, d)| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        (self.handler)(request, bearer)
    }
}

pub fn json(status: StatusCode, body: serde_json::Value) -> Result<ApiResponse, TransportError> {
    Ok(ApiResponse::new(status, body.to_string()))
}

pub fn ok(body: serde_json::Value) -> Result<ApiResponse, TransportError> {
    json(StatusCode::OK, body)
}

pub fn status(status: StatusCode) -> Result<ApiResponse, TransportError> {
    Ok(ApiResponse::new(status, ""))
}

pub fn pair(access: &str, refresh: &str) -> TokenPair {
    TokenPair::new(AccessToken(access.into()), RefreshToken(refresh.into()))
}

/// Token store over fresh memory storage, optionally seeded with a pair.
pub fn token_store(seed: Option<TokenPair>) -> (Arc<MemoryTokenStorage>, Arc<TokenStore>) {
    let storage = Arc::new(MemoryTokenStorage::new());
    if let Some(seed) = seed {
        if let Some(access) = &seed.access {
            storage.save(ACCESS_TOKEN_KEY, &access.0).unwrap();
        }
        if let Some(refresh) = &seed.refresh {
            storage.save(REFRESH_TOKEN_KEY, &refresh.0).unwrap();
        }
    }
    let store = Arc::new(TokenStore::open(storage.clone()));
    (storage, store)
}

pub fn bearer_is(bearer: Option<&AccessToken>, expected: &str) -> bool {
    bearer.map(|t| t.0.as_str()) == Some(expected)
}
