use serde::{Deserialize, Serialize};

use crate::domain::TagKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i32,
    #[serde(rename = "type")]
    pub kind: TagKind,
    pub tag: String,
    pub slug: String,
    pub name: String,
}
