use crate::application_port::*;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

struct PaginationState<T, C> {
    items: Vec<T>,
    cursor: Option<C>,
    loaded: bool,
    exhausted: bool,
    in_flight: bool,
    last_error: Option<String>,
}

impl<T, C> PaginationState<T, C> {
    fn status(&self) -> FeedStatus {
        FeedStatus {
            loaded_items: self.items.len(),
            has_more: !self.exhausted,
            loading: self.in_flight,
            last_error: self.last_error.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Initial,
    More,
}

/// Accumulates the pages of one feed into a single list.
///
/// Invariants:
/// - `items` only grows, and earlier items never move.
/// - exhaustion is terminal.
/// - at most one fetch is outstanding; extra triggers return
///   [`LoadOutcome::Skipped`] without touching the network.
/// - a failed fetch leaves items, cursor and exhaustion untouched, so the
///   same cursor can simply be tried again.
pub struct Paginator<S: PageSource> {
    source: S,
    state: Mutex<PaginationState<S::Item, S::Cursor>>,
    status: watch::Sender<FeedStatus>,
}

impl<S: PageSource> Paginator<S> {
    pub fn new(source: S) -> Self {
        let (status, _) = watch::channel(FeedStatus::default());
        Self {
            source,
            state: Mutex::new(PaginationState {
                items: Vec::new(),
                cursor: None,
                loaded: false,
                exhausted: false,
                in_flight: false,
                last_error: None,
            }),
            status,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch the first page. No-op once loaded or while a fetch is running.
    pub async fn initial_load(&self) -> Result<LoadOutcome, FeedError> {
        match self.claim(Phase::Initial) {
            Some(cursor) => self.run_claimed(cursor).await,
            None => Ok(LoadOutcome::Skipped),
        }
    }

    /// Fetch the page after the stored cursor.
    ///
    /// No-op when exhausted, while a fetch is running, or before the
    /// initial load has completed.
    pub async fn load_more(&self) -> Result<LoadOutcome, FeedError> {
        match self.claim(Phase::More) {
            Some(cursor) => self.run_claimed(cursor).await,
            None => Ok(LoadOutcome::Skipped),
        }
    }

    pub fn items(&self) -> Vec<S::Item> {
        self.state.lock().items.clone()
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    pub fn has_more(&self) -> bool {
        !self.state.lock().exhausted
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().in_flight
    }

    pub fn is_loaded(&self) -> bool {
        self.state.lock().loaded
    }

    pub fn cursor(&self) -> Option<S::Cursor> {
        self.state.lock().cursor.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedStatus> {
        self.status.subscribe()
    }

    /// Hook a visibility sentinel to this feed.
    pub fn attach_sentinel(self: &Arc<Self>) -> Sentinel<S> {
        Sentinel {
            paginator: self.clone(),
            visible: AtomicBool::new(false),
            detached: CancellationToken::new(),
        }
    }

    /// Mark a fetch as started and hand out the cursor it must use.
    /// `None` means the guard rejected the fetch.
    fn claim(&self, phase: Phase) -> Option<Option<S::Cursor>> {
        let cursor = {
            let mut state = self.state.lock();
            let allowed = match phase {
                Phase::Initial => !state.loaded && state.items.is_empty(),
                Phase::More => state.loaded && !state.exhausted,
            };
            if !allowed || state.in_flight {
                tracing::trace!(?phase, "fetch skipped");
                return None;
            }
            state.in_flight = true;
            state.cursor.clone()
        };
        self.publish();
        Some(cursor)
    }

    async fn run_claimed(&self, cursor: Option<S::Cursor>) -> Result<LoadOutcome, FeedError> {
        let mut guard = InFlightGuard {
            paginator: self,
            armed: true,
        };
        let result = self.source.fetch_page(cursor.as_ref()).await;

        let outcome = {
            let mut state = self.state.lock();
            state.in_flight = false;
            guard.armed = false;
            match result {
                Ok(page) => {
                    let count = page.items.len();
                    if page.items.is_empty() || page.next_cursor.is_none() {
                        state.exhausted = true;
                    }
                    state.items.extend(page.items);
                    if let Some(next) = page.next_cursor {
                        state.cursor = Some(next);
                    }
                    state.loaded = true;
                    state.last_error = None;
                    tracing::debug!(
                        appended = count,
                        total = state.items.len(),
                        exhausted = state.exhausted,
                        "page loaded"
                    );
                    Ok(if state.exhausted {
                        LoadOutcome::Exhausted(count)
                    } else {
                        LoadOutcome::Appended(count)
                    })
                }
                Err(e) => {
                    tracing::warn!(?cursor, "page fetch failed: {}", e);
                    state.last_error = Some(e.to_string());
                    Err(e)
                }
            }
        };
        drop(guard);
        self.publish();
        outcome
    }

    fn can_resume(&self) -> bool {
        let state = self.state.lock();
        state.loaded && !state.exhausted && !state.in_flight
    }

    fn publish(&self) {
        let status = self.state.lock().status();
        self.status.send_replace(status);
    }
}

/// Releases the in-flight flag if a fetch future is dropped before it settles.
struct InFlightGuard<'a, S: PageSource> {
    paginator: &'a Paginator<S>,
    armed: bool,
}

impl<S: PageSource> Drop for InFlightGuard<'_, S> {
    fn drop(&mut self) {
        if self.armed {
            self.paginator.state.lock().in_flight = false;
            self.paginator.publish();
        }
    }
}

/// Visibility marker at the end of a rendered feed.
///
/// The view reports visibility changes through [`Sentinel::set_visible`];
/// each not-visible to visible edge loads the next page if one may be
/// fetched right now. Must be used from within a tokio runtime.
pub struct Sentinel<S: PageSource> {
    paginator: Arc<Paginator<S>>,
    visible: AtomicBool,
    detached: CancellationToken,
}

impl<S: PageSource> Sentinel<S> {
    /// Returns the handle of the spawned fetch, if this notification started one.
    pub fn set_visible(&self, visible: bool) -> Option<JoinHandle<()>> {
        let was_visible = self.visible.swap(visible, Ordering::AcqRel);
        if !visible || was_visible || self.detached.is_cancelled() {
            return None;
        }
        if !self.paginator.can_resume() {
            return None;
        }
        // claim before spawning so a burst of edges cannot queue extra fetches
        let cursor = self.paginator.claim(Phase::More)?;
        let paginator = self.paginator.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = paginator.run_claimed(cursor).await {
                tracing::debug!("sentinel load failed: {}", e);
            }
        }))
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }

    /// The view went away; later notifications are ignored.
    pub fn detach(&self) {
        self.detached.cancel();
    }

    pub fn is_detached(&self) -> bool {
        self.detached.is_cancelled()
    }
}
