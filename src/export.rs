use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;

use anyhow::Context;
use github_slugger::Slugger;
use serde::Serialize;

use crate::content::{derive_legacy_text, Block};
use crate::lesson::Lesson;

#[derive(Serialize, Debug)]
#[serde(untagged)]
enum Frontmatter<'a> {
    Title(&'a str),
    Id(&'a str),
    Order(usize),
    Blocks(Vec<BlockMeta<'a>>),
}

#[derive(Serialize, Debug)]
struct BlockMeta<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
}

/// Serializes a lesson to Markdown with a YAML frontmatter header, for
/// static export of course content.
///
/// Each block becomes a `##` section with a slugged anchor; the section body
/// is the block's plain-text projection, so the export stays grep-able and
/// diff-friendly rather than carrying raw HTML.
pub fn serialize_lesson(lesson: &Lesson) -> anyhow::Result<String> {
    let blocks = lesson.blocks();

    let mut fm: BTreeMap<&str, Frontmatter> = BTreeMap::new();
    fm.insert("title", Frontmatter::Title(lesson.title.as_str()));
    fm.insert("id", Frontmatter::Id(lesson.id.as_str()));
    fm.insert("order", Frontmatter::Order(lesson.order));
    fm.insert(
        "blocks",
        Frontmatter::Blocks(
            blocks
                .iter()
                .map(|b| BlockMeta {
                    id: &b.id,
                    kind: b.kind_name(),
                    title: b.title.as_deref(),
                })
                .collect(),
        ),
    );

    let mut slugger = Slugger::default();
    let mut body = String::with_capacity(400 * blocks.len());
    for block in &blocks {
        body.push_str(&section(block, &mut slugger));
        body.push('\n');
    }

    Ok(format!(
        r#"---
{}---

{}"#,
        serde_yaml_ng::to_string(&fm)?,
        body
    ))
}

fn section(block: &Block, slugger: &mut Slugger) -> String {
    let heading = block.title.as_deref().unwrap_or_else(|| block.label());
    let anchor = slugger.slug(heading);
    let text = derive_legacy_text(std::slice::from_ref(block));
    format!("## {} {{#{}}}\n\n{}\n", heading, anchor, text)
}

/// Writes the lesson export into `output_dir`, named by order and slugged
/// title. Fails if the file already exists; callers recreate the directory
/// per run.
pub fn write_lesson(lesson: &Lesson, output_dir: &str) -> anyhow::Result<()> {
    let mut slugger = Slugger::default();
    let file_name = format!("{}-{}.md", lesson.order, slugger.slug(&lesson.title));

    let mut file = OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(format!("{}/{}", output_dir, file_name))
        .context(format!("failed to create export file {}", file_name))?;

    let serialized = serialize_lesson(lesson)?;
    write!(file, "{}", serialized).context(format!("failed to write lesson {}", lesson.id))?;

    Ok(())
}
