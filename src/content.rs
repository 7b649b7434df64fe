pub mod block;
pub mod codec;
pub mod editor;
pub mod render;

pub use block::{Block, BlockBody, BlockData, BlockKind, QuizQuestion};
pub use codec::{decode, derive_legacy_text, encode};
pub use editor::{DragSource, LessonEditor, LANGUAGE_SUGGESTIONS};
pub use render::{render_block, render_lesson};
