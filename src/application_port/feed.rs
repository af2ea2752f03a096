use crate::application_port::SessionError;
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

/// One page as returned by a feed endpoint.
///
/// `next_cursor == None` means the server has nothing after this page.
#[derive(Debug, Clone)]
pub struct Page<T, C> {
    pub items: Vec<T>,
    pub next_cursor: Option<C>,
}

impl<T, C> Page<T, C> {
    pub fn new(items: Vec<T>, next_cursor: Option<C>) -> Self {
        Page { items, next_cursor }
    }

    pub fn last(items: Vec<T>) -> Self {
        Page {
            items,
            next_cursor: None,
        }
    }
}

/// Fetches one page of a feed, resuming after `cursor` (`None` = first page).
#[async_trait::async_trait]
pub trait PageSource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;
    type Cursor: Clone + fmt::Debug + Send + Sync + 'static;

    async fn fetch_page(
        &self,
        cursor: Option<&Self::Cursor>,
    ) -> Result<Page<Self::Item, Self::Cursor>, FeedError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The page was appended and more pages may follow.
    Appended(usize),
    /// The page (possibly empty) was appended and the feed is now exhausted.
    Exhausted(usize),
    /// Guarded out without a network call.
    Skipped,
}

/// What a view needs to render a feed's footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedStatus {
    pub loaded_items: usize,
    pub has_more: bool,
    pub loading: bool,
    pub last_error: Option<String>,
}

impl Default for FeedStatus {
    fn default() -> Self {
        FeedStatus {
            loaded_items: 0,
            has_more: true,
            loading: false,
            last_error: None,
        }
    }
}
