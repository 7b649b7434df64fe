use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Discriminant for the closed set of lesson block variants.
///
/// The wire names are the values stored in the `type` field of every
/// serialized block and must not change, or existing lessons stop decoding
/// as their original variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlockKind {
    Text,
    Video,
    Image,
    Embed,
    File,
    Quiz,
    Code,
    Assignment,
}

impl BlockKind {
    /// Every kind, in the order the editor toolbar lists them.
    pub const ALL: [BlockKind; 8] = [
        BlockKind::Text,
        BlockKind::Video,
        BlockKind::Image,
        BlockKind::Embed,
        BlockKind::File,
        BlockKind::Quiz,
        BlockKind::Code,
        BlockKind::Assignment,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            BlockKind::Text => "TEXT",
            BlockKind::Video => "VIDEO",
            BlockKind::Image => "IMAGE",
            BlockKind::Embed => "EMBED",
            BlockKind::File => "FILE",
            BlockKind::Quiz => "QUIZ",
            BlockKind::Code => "CODE",
            BlockKind::Assignment => "ASSIGNMENT",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            BlockKind::Text => "📝",
            BlockKind::Video => "🎬",
            BlockKind::Image => "🖼️",
            BlockKind::Embed => "🔗",
            BlockKind::File => "📄",
            BlockKind::Quiz => "❓",
            BlockKind::Code => "💻",
            BlockKind::Assignment => "📋",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BlockKind::Text => "Text",
            BlockKind::Video => "Video",
            BlockKind::Image => "Image",
            BlockKind::Embed => "Embedded content",
            BlockKind::File => "File",
            BlockKind::Quiz => "Quiz",
            BlockKind::Code => "Code",
            BlockKind::Assignment => "Assignment",
        }
    }

    /// Default title the editor assigns to a freshly created block.
    pub fn default_title(self) -> &'static str {
        match self {
            BlockKind::Text => "Text block",
            _ => self.label(),
        }
    }
}

/// One question inside a quiz block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: String,

    #[serde(default)]
    pub question: String,

    /// Answer options, at least two at all times.
    #[serde(default)]
    pub options: Vec<String>,

    /// 0-based index into `options` marking the correct answer.
    #[serde(rename = "correctOptionIndex", default)]
    pub correct_option_index: usize,
}

impl QuizQuestion {
    /// A blank question: empty text, two empty options, first option correct.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            question: String::new(),
            options: vec![String::new(), String::new()],
            correct_option_index: 0,
        }
    }
}

impl Default for QuizQuestion {
    fn default() -> Self {
        Self::new()
    }
}

/// Variant-specific payload of a block, tagged by the `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum BlockData {
    Text {
        #[serde(default)]
        content: String,
    },
    Video {
        #[serde(default)]
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Image {
        #[serde(default)]
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    Embed {
        #[serde(rename = "embedCode", default)]
        embed_code: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    File {
        #[serde(default)]
        url: String,
        #[serde(rename = "fileName", default)]
        file_name: String,
        #[serde(rename = "fileSize", default, skip_serializing_if = "Option::is_none")]
        file_size: Option<String>,
    },
    Quiz {
        #[serde(default)]
        questions: Vec<QuizQuestion>,
    },
    Code {
        #[serde(default)]
        code: String,
        #[serde(default)]
        language: String,
    },
    Assignment {
        #[serde(default)]
        instructions: String,
        #[serde(rename = "dueDate", default, skip_serializing_if = "Option::is_none")]
        due_date: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        points: Option<u32>,
    },
}

impl BlockData {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockData::Text { .. } => BlockKind::Text,
            BlockData::Video { .. } => BlockKind::Video,
            BlockData::Image { .. } => BlockKind::Image,
            BlockData::Embed { .. } => BlockKind::Embed,
            BlockData::File { .. } => BlockKind::File,
            BlockData::Quiz { .. } => BlockKind::Quiz,
            BlockData::Code { .. } => BlockKind::Code,
            BlockData::Assignment { .. } => BlockKind::Assignment,
        }
    }

    /// Empty payload for a freshly created block of the given kind.
    pub fn empty(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Text => BlockData::Text {
                content: String::new(),
            },
            BlockKind::Video => BlockData::Video {
                url: String::new(),
                description: Some(String::new()),
            },
            BlockKind::Image => BlockData::Image {
                url: String::new(),
                caption: Some(String::new()),
            },
            BlockKind::Embed => BlockData::Embed {
                embed_code: String::new(),
                description: Some(String::new()),
            },
            BlockKind::File => BlockData::File {
                url: String::new(),
                file_name: String::new(),
                file_size: None,
            },
            BlockKind::Quiz => BlockData::Quiz {
                questions: Vec::new(),
            },
            BlockKind::Code => BlockData::Code {
                code: String::new(),
                language: String::from("javascript"),
            },
            BlockKind::Assignment => BlockData::Assignment {
                instructions: String::new(),
                due_date: None,
                points: None,
            },
        }
    }
}

/// Body of a block: a recognized variant, or the raw fields of a block whose
/// `type` this build does not know about.
///
/// Unknown bodies are kept verbatim so that documents written by a newer
/// schema survive a load-edit-save cycle here without losing fields. Only the
/// renderer and the icon/label lookup treat unknown kinds specially; the
/// codec round-trips them untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockBody {
    Known(BlockData),
    Unknown(Map<String, Value>),
}

/// One typed unit of lesson content.
///
/// `order` is document-local: it only governs display order within one
/// lesson's block list and is renumbered to 0..n-1 after every structural
/// change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Opaque unique identifier, stable across edits.
    pub id: String,

    /// Zero-based position within the document.
    #[serde(default)]
    pub order: usize,

    /// Optional display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(flatten)]
    pub body: BlockBody,
}

impl Block {
    /// A default-initialized block of the given kind with a fresh id.
    ///
    /// The caller (normally the editor) assigns the real `order`.
    pub fn new(kind: BlockKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            order: 0,
            title: Some(kind.default_title().to_string()),
            body: BlockBody::Known(BlockData::empty(kind)),
        }
    }

    /// The recognized kind, or `None` for blocks of an unknown `type`.
    pub fn kind(&self) -> Option<BlockKind> {
        match &self.body {
            BlockBody::Known(data) => Some(data.kind()),
            BlockBody::Unknown(_) => None,
        }
    }

    /// The raw `type` tag, including unrecognized ones. Empty if the stored
    /// block carried no tag at all.
    pub fn kind_name(&self) -> &str {
        match &self.body {
            BlockBody::Known(data) => data.kind().wire_name(),
            BlockBody::Unknown(fields) => fields
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or_default(),
        }
    }

    /// Toolbar icon, with a generic placeholder for unknown kinds.
    pub fn icon(&self) -> &'static str {
        self.kind().map(BlockKind::icon).unwrap_or("📄")
    }

    /// Human-readable kind label, with a generic placeholder for unknown
    /// kinds.
    pub fn label(&self) -> &'static str {
        self.kind().map(BlockKind::label).unwrap_or("Block")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_stored_discriminants() {
        let names: Vec<&str> = BlockKind::ALL.iter().map(|k| k.wire_name()).collect();
        assert_eq!(
            names,
            ["TEXT", "VIDEO", "IMAGE", "EMBED", "FILE", "QUIZ", "CODE", "ASSIGNMENT"]
        );
    }

    #[test]
    fn new_block_has_default_title_and_empty_payload() {
        let block = Block::new(BlockKind::Code);
        assert_eq!(block.title.as_deref(), Some("Code"));
        assert_eq!(block.kind(), Some(BlockKind::Code));
        match block.body {
            BlockBody::Known(BlockData::Code { code, language }) => {
                assert_eq!(code, "");
                assert_eq!(language, "javascript");
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn block_serializes_with_flat_camel_case_fields() {
        let block = Block {
            id: "b1".into(),
            order: 3,
            title: None,
            body: BlockBody::Known(BlockData::File {
                url: "https://cdn.example/f.pdf".into(),
                file_name: "f.pdf".into(),
                file_size: Some("2.5 MB".into()),
            }),
        };

        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "FILE");
        assert_eq!(value["fileName"], "f.pdf");
        assert_eq!(value["fileSize"], "2.5 MB");
        assert!(value.get("title").is_none());
    }

    #[test]
    fn unknown_type_keeps_raw_fields() {
        let raw = r#"{"id":"x","order":0,"type":"BOGUS","payload":{"a":1}}"#;
        let block: Block = serde_json::from_str(raw).unwrap();

        assert_eq!(block.kind(), None);
        assert_eq!(block.kind_name(), "BOGUS");
        assert_eq!(block.icon(), "📄");
        assert_eq!(block.label(), "Block");

        let back = serde_json::to_value(&block).unwrap();
        assert_eq!(back["type"], "BOGUS");
        assert_eq!(back["payload"]["a"], 1);
    }

    #[test]
    fn fresh_ids_do_not_collide() {
        let a = Block::new(BlockKind::Text);
        let b = Block::new(BlockKind::Text);
        assert_ne!(a.id, b.id);
    }
}
