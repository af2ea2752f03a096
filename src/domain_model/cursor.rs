use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Continuation token the server hands out and expects back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpaqueCursor(pub String);

impl fmt::Display for OpaqueCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Items that live in a score-ranked list.
pub trait Ranked {
    fn score(&self) -> f64;
    fn rank_id(&self) -> i64;
}

/// Cursor for score-ranked lists.
///
/// Lists are ordered by descending score, then ascending id, so
/// `(score, id)` identifies a unique position even when scores collide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreCursor {
    pub score: f64,
    pub id: i64, // tiebreaker
}

impl ScoreCursor {
    /// Cursor positioned right after `item`.
    pub fn after<T: Ranked + ?Sized>(item: &T) -> Self {
        ScoreCursor {
            score: item.score(),
            id: item.rank_id(),
        }
    }

    /// Feed order of two ranked positions.
    pub fn ordering(a: (f64, i64), b: (f64, i64)) -> Ordering {
        b.0.total_cmp(&a.0).then(a.1.cmp(&b.1))
    }

    /// Whether `(score, id)` comes strictly after this cursor.
    pub fn admits(&self, score: f64, id: i64) -> bool {
        Self::ordering((self.score, self.id), (score, id)) == Ordering::Less
    }

    pub fn admits_item<T: Ranked + ?Sized>(&self, item: &T) -> bool {
        self.admits(item.score(), item.rank_id())
    }
}

impl fmt::Display for ScoreCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}", self.score, self.id)
    }
}

/// Page counter for feeds without a stable cursor.
///
/// Weakest of the three: if the server-side list changes between two
/// requests, items can be skipped or repeated.
#[derive(Debug, Clone, Copy, Default, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageNumber(pub u32);

impl PageNumber {
    pub fn next(self) -> Self {
        PageNumber(self.0.saturating_add(1))
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
