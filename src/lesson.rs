use serde::{Deserialize, Serialize};

use crate::content::{codec, Block};

/// A stored lesson record as the platform's API returns it.
///
/// The structured document lives in `content_json` as an opaque string; the
/// server never reinterprets it. `content` is the derived plain-text
/// projection kept for lessons that predate structured content and for plain
/// search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,

    pub title: String,

    /// Legacy flat-text content.
    #[serde(default)]
    pub content: String,

    /// Encoded block document, absent on pre-structured lessons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_json: Option<String>,

    /// Relative position of the lesson within its course.
    #[serde(default)]
    pub order: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Lesson {
    /// Decodes the lesson's block document, degrading to a single text block
    /// wrapping the legacy content when the structured form is missing or
    /// malformed. Never fails.
    pub fn blocks(&self) -> Vec<Block> {
        codec::decode(self.content_json.as_deref(), Some(&self.content))
    }
}

/// Payload for creating or patching a lesson.
///
/// Built from the block document: the structured form is authoritative and
/// the flat `content` is regenerated from it on every save, never edited
/// independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonUpdate {
    pub title: String,
    pub content: String,
    pub content_json: String,
    pub order: usize,
}

impl LessonUpdate {
    pub fn from_blocks(title: &str, order: usize, blocks: &[Block]) -> serde_json::Result<Self> {
        Ok(Self {
            title: title.to_string(),
            content: codec::derive_legacy_text(blocks),
            content_json: codec::encode(blocks)?,
            order,
        })
    }
}
