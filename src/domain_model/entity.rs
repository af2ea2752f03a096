use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EntityId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(EntityId)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub tag_type: i32,
}

/// Stance preview shown under an entity in the entity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityFeedStance {
    pub id: super::StanceId,
    pub headline: String,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityFeedEntity {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub kind: i32,
    pub title: String,
    pub images_json: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub stances: Vec<EntityFeedStance>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

/// Entity block embedded in stance records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StanceEntity {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub kind: i32,
    pub title: String,
    pub images_json: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}
