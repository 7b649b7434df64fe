use github_slugger::Slugger;

use super::block::{Block, BlockBody, BlockData, QuizQuestion};

/// Renders one block to an HTML fragment for the student-facing lesson view.
///
/// Pure dispatch on the block's kind; blocks of an unknown kind render as
/// `None` and are skipped. All user text is escaped, with one deliberate
/// exception: embed markup is injected raw. Lesson authorship is restricted
/// to teachers and their embeds are trusted as-is, so never feed untrusted
/// documents through here.
pub fn render_block(block: &Block) -> Option<String> {
    let mut slugger = Slugger::default();
    render_block_with(block, &mut slugger)
}

/// Renders a whole document in order, dropping unknown blocks. Heading
/// anchors are slugged per document so repeated titles stay unique.
pub fn render_lesson(blocks: &[Block]) -> String {
    let mut ordered: Vec<&Block> = blocks.iter().collect();
    ordered.sort_by_key(|b| b.order);

    let mut slugger = Slugger::default();
    ordered
        .iter()
        .filter_map(|block| render_block_with(block, &mut slugger))
        .collect::<Vec<String>>()
        .join("\n")
}

fn render_block_with(block: &Block, slugger: &mut Slugger) -> Option<String> {
    let data = match &block.body {
        BlockBody::Known(data) => data,
        BlockBody::Unknown(_) => return None,
    };

    let mut parts: Vec<String> = Vec::new();
    if let Some(title) = block.title.as_deref().filter(|t| !t.is_empty()) {
        let anchor = slugger.slug(title);
        parts.push(format!("<h2 id=\"{}\">{}</h2>", anchor, escape_html(title)));
    }

    match data {
        BlockData::Text { content } => {
            parts.extend(paragraphs(content));
        }
        BlockData::Video { url, description } => {
            if !url.is_empty() {
                parts.push(format!(
                    "<div class=\"video-frame\"><iframe src=\"{}\" allowfullscreen></iframe></div>",
                    escape_html(url)
                ));
            }
            if let Some(description) = description.as_deref().filter(|d| !d.is_empty()) {
                parts.push(format!(
                    "<p class=\"description\">{}</p>",
                    escape_html(description)
                ));
            }
        }
        BlockData::Image { url, caption } => {
            if !url.is_empty() {
                parts.push(format!(
                    "<figure><img src=\"{}\" alt=\"{}\"></figure>",
                    escape_html(url),
                    escape_html(block.title.as_deref().unwrap_or_default())
                ));
            }
            if let Some(caption) = caption.as_deref().filter(|c| !c.is_empty()) {
                parts.push(format!(
                    "<p class=\"caption\">{}</p>",
                    escape_html(caption)
                ));
            }
        }
        // Trust boundary: teacher-authored markup goes in unsanitized.
        BlockData::Embed {
            embed_code,
            description,
        } => {
            if !embed_code.is_empty() {
                parts.push(embed_code.clone());
            }
            if let Some(description) = description.as_deref().filter(|d| !d.is_empty()) {
                parts.push(format!(
                    "<p class=\"description\">{}</p>",
                    escape_html(description)
                ));
            }
        }
        BlockData::File {
            url,
            file_name,
            file_size,
        } => {
            let label = match file_size {
                Some(size) if !size.is_empty() => format!("{file_name} ({size})"),
                _ => file_name.clone(),
            };
            if !url.is_empty() {
                parts.push(format!(
                    "<p class=\"file\"><a href=\"{}\" download>{}</a></p>",
                    escape_html(url),
                    escape_html(&label)
                ));
            } else if !label.is_empty() {
                parts.push(format!("<p class=\"file\">{}</p>", escape_html(&label)));
            }
        }
        BlockData::Quiz { questions } => {
            for question in questions {
                parts.push(render_question(question));
            }
        }
        BlockData::Code { code, language } => {
            parts.push(format!(
                "<pre><code class=\"language-{}\">{}</code></pre>",
                escape_html(language),
                escape_html(code)
            ));
        }
        BlockData::Assignment {
            instructions,
            due_date,
            points,
        } => {
            parts.extend(paragraphs(instructions));
            if let Some(due) = due_date.as_deref().filter(|d| !d.is_empty()) {
                parts.push(format!("<p class=\"due-date\">Due: {}</p>", escape_html(due)));
            }
            if let Some(points) = points {
                parts.push(format!("<p class=\"points\">Points: {points}</p>"));
            }
        }
    }

    Some(parts.join("\n"))
}

/// One question with its options as inert radio inputs. Selection is display
/// only on the read view; there is no submission or grading.
fn render_question(question: &QuizQuestion) -> String {
    let mut out = String::from("<fieldset class=\"quiz-question\">");
    out.push_str(&format!(
        "<legend>{}</legend>",
        escape_html(&question.question)
    ));
    for option in &question.options {
        out.push_str(&format!(
            "<label><input type=\"radio\" name=\"quiz-{}\"> {}</label>",
            escape_html(&question.id),
            escape_html(option)
        ));
    }
    out.push_str("</fieldset>");
    out
}

fn paragraphs(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| format!("<p>{}</p>", escape_html(line)))
        .collect()
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::block::BlockKind;

    fn block(kind: BlockKind, body: BlockData) -> Block {
        let mut block = Block::new(kind);
        block.title = None;
        block.body = BlockBody::Known(body);
        block
    }

    #[test]
    fn text_splits_into_paragraphs_on_newlines() {
        let b = block(
            BlockKind::Text,
            BlockData::Text {
                content: "first line\n\nsecond line".into(),
            },
        );
        assert_eq!(
            render_block(&b).unwrap(),
            "<p>first line</p>\n<p>second line</p>"
        );
    }

    #[test]
    fn text_content_is_escaped() {
        let b = block(
            BlockKind::Text,
            BlockData::Text {
                content: "<script>alert(1)</script>".into(),
            },
        );
        let html = render_block(&b).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn video_without_url_renders_description_but_no_iframe() {
        let b = block(
            BlockKind::Video,
            BlockData::Video {
                url: String::new(),
                description: Some("Watch later".into()),
            },
        );
        let html = render_block(&b).unwrap();
        assert!(!html.contains("<iframe"));
        assert!(html.contains("Watch later"));
    }

    #[test]
    fn embed_markup_is_injected_raw() {
        let b = block(
            BlockKind::Embed,
            BlockData::Embed {
                embed_code: "<iframe src=\"https://maps.example\"></iframe>".into(),
                description: None,
            },
        );
        let html = render_block(&b).unwrap();
        assert!(html.contains("<iframe src=\"https://maps.example\"></iframe>"));
    }

    #[test]
    fn quiz_renders_inert_options_without_marking_the_answer() {
        let b = block(
            BlockKind::Quiz,
            BlockData::Quiz {
                questions: vec![QuizQuestion {
                    id: "q1".into(),
                    question: "Pick one".into(),
                    options: vec!["left".into(), "right".into()],
                    correct_option_index: 1,
                }],
            },
        );
        let html = render_block(&b).unwrap();
        assert_eq!(html.matches("type=\"radio\"").count(), 2);
        assert!(!html.contains("correct"));
        assert!(!html.contains("checked"));
    }

    #[test]
    fn unknown_kind_renders_nothing() {
        let raw = r#"{"id":"x","order":0,"type":"BOGUS"}"#;
        let b: Block = serde_json::from_str(raw).unwrap();
        assert_eq!(render_block(&b), None);
    }

    #[test]
    fn lesson_renders_in_document_order_and_skips_unknown_blocks() {
        let raw = r#"[
            {"id":"c","order":2,"type":"TEXT","content":"last"},
            {"id":"b","order":1,"type":"BOGUS"},
            {"id":"a","order":0,"type":"TEXT","content":"first"}
        ]"#;
        let blocks: Vec<Block> = serde_json::from_str(raw).unwrap();
        let html = render_lesson(&blocks);
        assert_eq!(html, "<p>first</p>\n<p>last</p>");
    }

    #[test]
    fn repeated_titles_get_distinct_anchors() {
        let mut a = Block::new(BlockKind::Text);
        a.title = Some("Notes".into());
        let mut b = Block::new(BlockKind::Text);
        b.title = Some("Notes".into());
        b.order = 1;

        let html = render_lesson(&[a, b]);
        assert!(html.contains("id=\"notes\""));
        assert!(html.contains("id=\"notes-1\""));
    }
}
