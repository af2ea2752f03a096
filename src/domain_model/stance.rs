use crate::domain_model::*;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StanceId(pub i64);

impl fmt::Display for StanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fully populated stance, as served by the home and following feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedStance {
    pub id: StanceId,
    pub user: StanceAuthor,
    pub entity: StanceEntity,
    pub headline: String,
    pub content_json: String,
    pub num_comments: u32,
    pub average_rating: Option<f64>,
    pub num_ratings: u32,
    pub my_rating: Option<i32>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub created_at: String,
}

/// Stance listed on an entity page; the entity itself is implied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStance {
    pub id: StanceId,
    pub user: StanceAuthor,
    pub headline: String,
    pub content_json: String,
    pub num_comments: u32,
    pub average_rating: Option<f64>,
    pub num_ratings: u32,
    pub my_rating: Option<i32>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(alias = "engagement_score")]
    pub score: f64,
}

impl Ranked for EntityStance {
    fn score(&self) -> f64 {
        self.score
    }

    fn rank_id(&self) -> i64 {
        self.id.0
    }
}

/// Stance listed on a user page; the author is implied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStance {
    pub id: StanceId,
    pub entity: StanceEntity,
    pub headline: String,
    pub content_json: String,
    pub num_comments: u32,
    pub average_rating: Option<f64>,
    pub num_ratings: u32,
    pub my_rating: Option<i32>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub created_at: String,
}
