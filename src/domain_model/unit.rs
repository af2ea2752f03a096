use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageSize(pub u16);

impl Default for PageSize {
    fn default() -> Self {
        PageSize(20)
    }
}
