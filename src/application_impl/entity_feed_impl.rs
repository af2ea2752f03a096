use crate::application_impl::AuthenticatedSession;
use crate::application_port::*;
use crate::domain_model::*;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct EntityFeedResponse {
    entities: Vec<EntityFeedEntity>,
    next_cursor: Option<OpaqueCursor>,
    #[serde(default)]
    has_more: Option<bool>,
}

/// Home entity feed, newest first.
pub struct EntityFeed {
    session: AuthenticatedSession,
    page_size: PageSize,
}

impl EntityFeed {
    pub fn new(session: AuthenticatedSession, page_size: PageSize) -> Self {
        Self { session, page_size }
    }
}

#[async_trait::async_trait]
impl PageSource for EntityFeed {
    type Item = EntityFeedEntity;
    type Cursor = OpaqueCursor;

    async fn fetch_page(
        &self,
        cursor: Option<&OpaqueCursor>,
    ) -> Result<Page<EntityFeedEntity, OpaqueCursor>, FeedError> {
        let request = ApiRequest::get("/entities")
            .with_query("limit", self.page_size.0)
            .with_query_opt("cursor", cursor);
        let response: EntityFeedResponse = self.session.request_json(&request).await?;

        let next_cursor = match response.has_more {
            Some(false) => None,
            _ => response.next_cursor,
        };
        Ok(Page::new(response.entities, next_cursor))
    }
}

#[derive(Debug, Deserialize)]
struct EntityStancesResponse {
    stances: Vec<EntityStance>,
    next_cursor: Option<ScoreCursor>,
}

/// Stances on one entity, best scored first.
///
/// The next cursor is taken from the tail of the accepted page. Items the
/// previous cursor does not admit were already served and are dropped.
pub struct EntityStancesFeed {
    session: AuthenticatedSession,
    entity_id: EntityId,
    page_size: PageSize,
}

impl EntityStancesFeed {
    pub fn new(session: AuthenticatedSession, entity_id: EntityId, page_size: PageSize) -> Self {
        Self {
            session,
            entity_id,
            page_size,
        }
    }
}

#[async_trait::async_trait]
impl PageSource for EntityStancesFeed {
    type Item = EntityStance;
    type Cursor = ScoreCursor;

    async fn fetch_page(
        &self,
        cursor: Option<&ScoreCursor>,
    ) -> Result<Page<EntityStance, ScoreCursor>, FeedError> {
        let request = ApiRequest::get(format!("/entities/{}/stances", self.entity_id))
            .with_query("limit", self.page_size.0)
            .with_query_opt("cursor_score", cursor.map(|c| c.score))
            .with_query_opt("cursor_id", cursor.map(|c| c.id));
        let response: EntityStancesResponse = self.session.request_json(&request).await?;

        Ok(accept_ranked_page(cursor, response.stances, response.next_cursor))
    }
}

fn accept_ranked_page<T: Ranked>(
    previous: Option<&ScoreCursor>,
    mut items: Vec<T>,
    server_cursor: Option<ScoreCursor>,
) -> Page<T, ScoreCursor> {
    if let Some(previous) = previous {
        let before = items.len();
        items.retain(|item| previous.admits_item(item));
        if items.len() != before {
            tracing::warn!(
                dropped = before - items.len(),
                cursor = %previous,
                "server returned items at or before the cursor"
            );
        }
    }

    // A page with nothing past the cursor ends the feed even if the server
    // sent a cursor; resuming from the same position would loop forever.
    let next_cursor = server_cursor.and_then(|server| {
        let derived = items.last().map(|tail| ScoreCursor::after(tail))?;
        if derived != server {
            tracing::debug!(%server, %derived, "server cursor differs from page tail");
        }
        Some(derived)
    });
    Page::new(items, next_cursor)
}
