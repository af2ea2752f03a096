use crate::application_impl::AuthenticatedSession;
use crate::application_port::*;
use crate::domain_model::*;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct StanceListResponse {
    stances: Vec<FeedStance>,
    #[serde(default)]
    next_cursor: Option<OpaqueCursor>,
}

/// Stances from accounts the current user follows, newest first.
pub struct FollowingStanceFeed {
    session: AuthenticatedSession,
    page_size: PageSize,
}

impl FollowingStanceFeed {
    pub fn new(session: AuthenticatedSession, page_size: PageSize) -> Self {
        Self { session, page_size }
    }
}

#[async_trait::async_trait]
impl PageSource for FollowingStanceFeed {
    type Item = FeedStance;
    type Cursor = OpaqueCursor;

    async fn fetch_page(
        &self,
        cursor: Option<&OpaqueCursor>,
    ) -> Result<Page<FeedStance, OpaqueCursor>, FeedError> {
        let body = serde_json::json!({
            "num_stances": self.page_size.0,
            "cursor": cursor,
        });
        let request = ApiRequest::post("/stances/following-feed").with_body(body);
        let response: StanceListResponse = self.session.request_json(&request).await?;
        Ok(Page::new(response.stances, response.next_cursor))
    }
}

#[derive(Debug, Deserialize)]
struct RandomStancesResponse {
    stances: Vec<FeedStance>,
}

/// Swipeable home stance feed.
///
/// The server has no stable order for this feed, so it is paged with a
/// plain counter and keeps going until a page comes back empty. Items may
/// repeat or be skipped if the server-side set changes between pages.
pub struct StanceFeed {
    session: AuthenticatedSession,
    page_size: PageSize,
    entities: Vec<EntityId>,
    initial_stance: Option<StanceId>,
}

impl StanceFeed {
    pub fn new(session: AuthenticatedSession, page_size: PageSize) -> Self {
        Self {
            session,
            page_size,
            entities: Vec::new(),
            initial_stance: None,
        }
    }

    /// Restrict the feed to stances on these entities.
    pub fn with_entities(mut self, entities: Vec<EntityId>) -> Self {
        self.entities = entities;
        self
    }

    /// Pin a stance at the top of the first page.
    pub fn starting_at(mut self, stance: StanceId) -> Self {
        self.initial_stance = Some(stance);
        self
    }
}

#[async_trait::async_trait]
impl PageSource for StanceFeed {
    type Item = FeedStance;
    type Cursor = PageNumber;

    async fn fetch_page(
        &self,
        cursor: Option<&PageNumber>,
    ) -> Result<Page<FeedStance, PageNumber>, FeedError> {
        let page = cursor.copied().unwrap_or_default();
        let initial_stance = if page == PageNumber(0) {
            self.initial_stance
        } else {
            None
        };
        let body = serde_json::json!({
            "num_stances": self.page_size.0,
            "entities": self.entities,
            "initial_stance_id": initial_stance,
            "page": page,
        });
        let request = ApiRequest::post("/stances/feed").with_body(body);
        let response: RandomStancesResponse = self.session.request_json(&request).await?;

        let next_cursor = if response.stances.is_empty() {
            None
        } else {
            Some(page.next())
        };
        Ok(Page::new(response.stances, next_cursor))
    }
}
