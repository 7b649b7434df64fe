use super::block::{Block, BlockBody, BlockData};

/// Id of the synthetic block produced when a stored document cannot be
/// decoded.
pub const LEGACY_BLOCK_ID: &str = "legacy-content";

/// Title of the synthetic fallback block.
pub const LEGACY_BLOCK_TITLE: &str = "Lesson content";

/// Serializes a block list into the string stored in the lesson's
/// `contentJson` field. Lossless for every variant, including unknown ones.
pub fn encode(blocks: &[Block]) -> serde_json::Result<String> {
    serde_json::to_string(blocks)
}

/// Decodes the stored `contentJson` string back into a block list.
///
/// Lessons created before structured content existed have no `contentJson`,
/// and a handful of early ones carry strings that never were valid block
/// lists. Those all degrade to a single synthetic text block wrapping the
/// plain `content` field, so every historical lesson stays viewable. This
/// function never fails.
pub fn decode(serialized: Option<&str>, legacy_text: Option<&str>) -> Vec<Block> {
    if let Some(raw) = serialized {
        match serde_json::from_str::<Vec<Block>>(raw) {
            Ok(blocks) => return blocks,
            Err(err) => {
                log::warn!("stored block document is malformed, falling back to plain text: {err}");
            }
        }
    }

    vec![legacy_block(legacy_text.unwrap_or_default())]
}

fn legacy_block(content: &str) -> Block {
    Block {
        id: LEGACY_BLOCK_ID.to_string(),
        order: 0,
        title: Some(LEGACY_BLOCK_TITLE.to_string()),
        body: BlockBody::Known(BlockData::Text {
            content: content.to_string(),
        }),
    }
}

/// Derives the lossy plain-text projection stored in the lesson's legacy
/// `content` field.
///
/// The structured document is authoritative; this string is regenerated from
/// it on every save and is kept only for plain display and search. Non-text
/// blocks flatten to a deterministic `[KIND: ...]` tag so they stay
/// distinguishable from prose. Quiz questions and answers never leak here,
/// only their count.
pub fn derive_legacy_text(blocks: &[Block]) -> String {
    let mut ordered: Vec<&Block> = blocks.iter().collect();
    ordered.sort_by_key(|b| b.order);

    ordered
        .iter()
        .map(|block| flatten_block(block))
        .collect::<Vec<String>>()
        .join("\n\n")
}

fn flatten_block(block: &Block) -> String {
    let data = match &block.body {
        BlockBody::Known(data) => data,
        BlockBody::Unknown(_) => return block.title.clone().unwrap_or_default(),
    };

    match data {
        BlockData::Text { content } => content.clone(),
        BlockData::Video { url, description } => {
            format!("[VIDEO: {url}]\n{}", description.as_deref().unwrap_or_default())
        }
        BlockData::Image { url, caption } => {
            format!("[IMAGE: {url}]\n{}", caption.as_deref().unwrap_or_default())
        }
        BlockData::Code { code, language } => format!("[CODE: {language}]\n{code}"),
        BlockData::Quiz { questions } => format!("[QUIZ: {} questions]", questions.len()),
        BlockData::Assignment { instructions, .. } => format!("[ASSIGNMENT]\n{instructions}"),
        BlockData::Embed { description, .. } => {
            format!("[EMBED]\n{}", description.as_deref().unwrap_or_default())
        }
        BlockData::File { url, file_name, .. } => format!("[FILE: {url}]\n{file_name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::block::{BlockKind, QuizQuestion};

    fn sample_blocks() -> Vec<Block> {
        let mut text = Block::new(BlockKind::Text);
        text.body = BlockBody::Known(BlockData::Text {
            content: "Welcome to the course.".into(),
        });

        let mut video = Block::new(BlockKind::Video);
        video.order = 1;
        video.body = BlockBody::Known(BlockData::Video {
            url: "https://youtube.com/watch?v=abc".into(),
            description: Some("Intro lecture".into()),
        });

        let mut quiz = Block::new(BlockKind::Quiz);
        quiz.order = 2;
        quiz.body = BlockBody::Known(BlockData::Quiz {
            questions: vec![QuizQuestion {
                id: "q1".into(),
                question: "2 + 2?".into(),
                options: vec!["3".into(), "4".into()],
                correct_option_index: 1,
            }],
        });

        vec![text, video, quiz]
    }

    #[test]
    fn encode_decode_round_trips_every_variant() {
        let blocks = sample_blocks();
        let encoded = encode(&blocks).unwrap();
        let decoded = decode(Some(&encoded), None);
        assert_eq!(decoded, blocks);
    }

    #[test]
    fn decode_preserves_stored_order_values() {
        let raw = r#"[
            {"id":"b","order":5,"type":"TEXT","content":"late"},
            {"id":"a","order":1,"type":"TEXT","content":"early"}
        ]"#;
        let blocks = decode(Some(raw), None);
        assert_eq!(blocks[0].order, 5);
        assert_eq!(blocks[1].order, 1);
    }

    #[test]
    fn garbage_falls_back_to_single_text_block_with_legacy_text() {
        let blocks = decode(Some("not json at all {"), Some("hello"));
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].id, LEGACY_BLOCK_ID);
        assert_eq!(blocks[0].order, 0);
        assert_eq!(blocks[0].title.as_deref(), Some(LEGACY_BLOCK_TITLE));
        assert_eq!(
            blocks[0].body,
            BlockBody::Known(BlockData::Text {
                content: "hello".into()
            })
        );
    }

    #[test]
    fn garbage_without_legacy_text_falls_back_to_empty_text_block() {
        let blocks = decode(Some("{\"not\":\"a list\"}"), None);
        assert_eq!(blocks.len(), 1);
        assert_eq!(
            blocks[0].body,
            BlockBody::Known(BlockData::Text {
                content: String::new()
            })
        );
    }

    #[test]
    fn absent_serialized_field_falls_back_too() {
        let blocks = decode(None, Some("plain lesson body"));
        assert_eq!(blocks.len(), 1);
        assert_eq!(
            blocks[0].body,
            BlockBody::Known(BlockData::Text {
                content: "plain lesson body".into()
            })
        );
    }

    #[test]
    fn unknown_type_survives_a_round_trip_unvalidated() {
        let raw = r#"[{"id":"x","order":0,"type":"BOGUS","mystery":true}]"#;
        let blocks = decode(Some(raw), None);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind_name(), "BOGUS");

        let encoded = encode(&blocks).unwrap();
        let reparsed = decode(Some(&encoded), None);
        assert_eq!(reparsed, blocks);
    }

    #[test]
    fn legacy_text_flattens_each_variant_deterministically() {
        let blocks = sample_blocks();
        let text = derive_legacy_text(&blocks);
        assert_eq!(
            text,
            "Welcome to the course.\n\n\
             [VIDEO: https://youtube.com/watch?v=abc]\nIntro lecture\n\n\
             [QUIZ: 1 questions]"
        );
        // Idempotent: same document, same projection.
        assert_eq!(derive_legacy_text(&blocks), text);
    }

    #[test]
    fn legacy_text_follows_document_order_not_list_order() {
        let mut blocks = sample_blocks();
        blocks.swap(0, 2);
        let text = derive_legacy_text(&blocks);
        assert!(text.starts_with("Welcome to the course."));
    }

    #[test]
    fn legacy_text_never_leaks_quiz_answers() {
        let blocks = sample_blocks();
        let text = derive_legacy_text(&blocks);
        assert!(!text.contains("2 + 2?"));
        assert!(!text.contains('4'));
    }
}
