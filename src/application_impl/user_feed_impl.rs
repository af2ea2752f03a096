use crate::application_impl::AuthenticatedSession;
use crate::application_port::*;
use crate::domain_model::*;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowDirection {
    Followers,
    Following,
}

impl FollowDirection {
    fn segment(self) -> &'static str {
        match self {
            FollowDirection::Followers => "followers",
            FollowDirection::Following => "following",
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserListResponse {
    users: Vec<UserSummary>,
    next_cursor: Option<OpaqueCursor>,
}

/// Followers or followed accounts of one user.
pub struct FollowersFeed {
    session: AuthenticatedSession,
    user_id: UserId,
    direction: FollowDirection,
    page_size: PageSize,
}

impl FollowersFeed {
    pub fn new(
        session: AuthenticatedSession,
        user_id: UserId,
        direction: FollowDirection,
        page_size: PageSize,
    ) -> Self {
        Self {
            session,
            user_id,
            direction,
            page_size,
        }
    }
}

#[async_trait::async_trait]
impl PageSource for FollowersFeed {
    type Item = UserSummary;
    type Cursor = OpaqueCursor;

    async fn fetch_page(
        &self,
        cursor: Option<&OpaqueCursor>,
    ) -> Result<Page<UserSummary, OpaqueCursor>, FeedError> {
        let path = format!("/users/{}/{}", self.user_id, self.direction.segment());
        let request = ApiRequest::get(path)
            .with_query("limit", self.page_size.0)
            .with_query_opt("cursor", cursor);
        let response: UserListResponse = self.session.request_json(&request).await?;
        Ok(Page::new(response.users, response.next_cursor))
    }
}

#[derive(Debug, Deserialize)]
struct UserStancesResponse {
    stances: Vec<UserStance>,
    next_cursor: Option<OpaqueCursor>,
}

/// Stances written by one user, newest first.
pub struct UserStancesFeed {
    session: AuthenticatedSession,
    user_id: UserId,
    page_size: PageSize,
}

impl UserStancesFeed {
    pub fn new(session: AuthenticatedSession, user_id: UserId, page_size: PageSize) -> Self {
        Self {
            session,
            user_id,
            page_size,
        }
    }
}

#[async_trait::async_trait]
impl PageSource for UserStancesFeed {
    type Item = UserStance;
    type Cursor = OpaqueCursor;

    async fn fetch_page(
        &self,
        cursor: Option<&OpaqueCursor>,
    ) -> Result<Page<UserStance, OpaqueCursor>, FeedError> {
        let body = serde_json::json!({
            "num_stances": self.page_size.0,
            "cursor": cursor,
        });
        let request = ApiRequest::post(format!("/users/{}/stances/feed", self.user_id)).with_body(body);
        let response: UserStancesResponse = self.session.request_json(&request).await?;
        Ok(Page::new(response.stances, response.next_cursor))
    }
}
