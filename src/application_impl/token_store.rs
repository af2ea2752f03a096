use crate::domain_model::*;
use crate::domain_port::*;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;

const EVENT_CAP: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenEvent {
    /// A login, signup or refresh installed a new pair.
    Updated,
    /// The store went from holding credentials to holding none.
    Cleared,
}

/// Single owner of the token pair for the lifetime of the process.
///
/// Durable storage only mirrors the in-memory pair. It is read once in
/// [`TokenStore::open`] and written on every change afterwards.
pub struct TokenStore {
    pair: RwLock<TokenPair>,
    storage: Arc<dyn TokenStorage>,
    events: broadcast::Sender<TokenEvent>,
}

impl TokenStore {
    pub fn open(storage: Arc<dyn TokenStorage>) -> Self {
        let pair = restore(storage.as_ref());
        if pair.access.is_some() {
            tracing::debug!("restored token pair from storage");
        }
        let (events, _) = broadcast::channel(EVENT_CAP);
        Self {
            pair: RwLock::new(pair),
            storage,
            events,
        }
    }

    pub fn current(&self) -> TokenPair {
        self.pair.read().clone()
    }

    pub fn access(&self) -> Option<AccessToken> {
        self.pair.read().access.clone()
    }

    pub fn refresh(&self) -> Option<RefreshToken> {
        self.pair.read().refresh.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.pair.read().access.is_some()
    }

    pub fn replace(&self, pair: TokenPair) {
        *self.pair.write() = pair.clone();
        self.mirror(&pair);
        let _ = self.events.send(TokenEvent::Updated);
    }

    /// Forget both tokens. Returns `false` if there was nothing to forget.
    pub fn clear(&self) -> bool {
        let held = {
            let mut pair = self.pair.write();
            let held = !pair.is_empty();
            *pair = TokenPair::default();
            held
        };
        if held {
            self.mirror(&TokenPair::default());
            let _ = self.events.send(TokenEvent::Cleared);
        }
        held
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TokenEvent> {
        self.events.subscribe()
    }

    fn mirror(&self, pair: &TokenPair) {
        let access = pair.access.as_ref().map(|t| t.0.as_str());
        let refresh = pair.refresh.as_ref().map(|t| t.0.as_str());
        for (key, value) in [(ACCESS_TOKEN_KEY, access), (REFRESH_TOKEN_KEY, refresh)] {
            let result = match value {
                Some(value) => self.storage.save(key, value),
                None => self.storage.remove(key),
            };
            if let Err(e) = result {
                tracing::warn!("failed to mirror {} to storage: {}", key, e);
            }
        }
    }
}

fn restore(storage: &dyn TokenStorage) -> TokenPair {
    let access = storage.load(ACCESS_TOKEN_KEY);
    let refresh = storage.load(REFRESH_TOKEN_KEY);
    match (access, refresh) {
        (Ok(Some(access)), Ok(Some(refresh))) => {
            TokenPair::new(AccessToken(access), RefreshToken(refresh))
        }
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!("failed to restore tokens from storage: {}", e);
            TokenPair::default()
        }
        _ => TokenPair::default(),
    }
}
