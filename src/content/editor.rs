use super::block::{Block, BlockBody, BlockData, BlockKind, QuizQuestion};

/// Languages offered by the code-block editor. Free-form values are still
/// accepted; this list only feeds the suggestion dropdown.
pub const LANGUAGE_SUGGESTIONS: &[&str] = &[
    "javascript",
    "typescript",
    "python",
    "java",
    "c",
    "cpp",
    "csharp",
    "ruby",
    "php",
    "swift",
    "go",
    "html",
    "css",
    "sql",
    "bash",
    "rust",
];

/// What is being dragged: a new block from the toolbar, or an existing block
/// by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSource {
    NewBlock(BlockKind),
    Existing(String),
}

type ChangeListener = Box<dyn FnMut(&[Block])>;

/// In-memory editing session over one lesson's block document.
///
/// Holds the ordered block list, the active-block selection, and transient
/// drag state. Every mutation renumbers `order` to 0..n-1 where the document
/// structure changed and notifies the change listener with the full list, so
/// the owning page can persist it. There is exactly one mutator per session;
/// concurrent edits of the same lesson are last-writer-wins at the store.
pub struct LessonEditor {
    blocks: Vec<Block>,
    active_block_id: Option<String>,
    drag_source: Option<DragSource>,
    drag_over_index: Option<usize>,
    on_change: Option<ChangeListener>,
}

impl LessonEditor {
    /// Starts a session over an existing document. The list is brought into
    /// position order so that list indices and `order` values agree.
    pub fn new(mut initial: Vec<Block>) -> Self {
        initial.sort_by_key(|b| b.order);
        Self {
            blocks: initial,
            active_block_id: None,
            drag_source: None,
            drag_over_index: None,
            on_change: None,
        }
    }

    /// Registers the listener invoked with the full block list after every
    /// mutation.
    pub fn on_change(mut self, listener: impl FnMut(&[Block]) + 'static) -> Self {
        self.on_change = Some(Box::new(listener));
        self
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn active_block_id(&self) -> Option<&str> {
        self.active_block_id.as_deref()
    }

    /// The block currently selected for detail editing, if any.
    pub fn active_block(&self) -> Option<&Block> {
        let id = self.active_block_id.as_deref()?;
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn set_active_block(&mut self, id: Option<&str>) {
        self.active_block_id = id.map(str::to_string);
    }

    /// Appends a default-initialized block of the given kind at
    /// `max(order) + 1` and selects it. Always succeeds.
    pub fn add_block(&mut self, kind: BlockKind) -> &Block {
        let mut block = Block::new(kind);
        block.order = self
            .blocks
            .iter()
            .map(|b| b.order + 1)
            .max()
            .unwrap_or(0);
        self.active_block_id = Some(block.id.clone());
        self.blocks.push(block);
        self.notify();
        self.blocks.last().unwrap()
    }

    /// Removes the block and renumbers the remainder. Clears the selection if
    /// the removed block was active. No-op for an unknown id.
    pub fn remove_block(&mut self, id: &str) {
        let Some(index) = self.blocks.iter().position(|b| b.id == id) else {
            return;
        };
        self.blocks.remove(index);
        self.renumber();
        if self.active_block_id.as_deref() == Some(id) {
            self.active_block_id = None;
        }
        self.notify();
    }

    /// Replaces the block with the matching id by full value. The caller owns
    /// the internal consistency of the replacement; only the quiz operations
    /// below re-validate anything. No-op for an unknown id.
    pub fn update_block(&mut self, updated: Block) {
        let Some(existing) = self.blocks.iter_mut().find(|b| b.id == updated.id) else {
            return;
        };
        *existing = updated;
        self.notify();
    }

    /// Moves the block at `from` to position `to` and renumbers. No-op when
    /// the indices agree or `from` is out of bounds.
    pub fn move_block(&mut self, from: usize, to: usize) {
        if from == to || from >= self.blocks.len() {
            return;
        }
        let block = self.blocks.remove(from);
        let to = to.min(self.blocks.len());
        self.blocks.insert(to, block);
        self.renumber();
        self.notify();
    }

    pub fn start_drag(&mut self, source: DragSource) {
        self.drag_source = Some(source);
    }

    pub fn drag_over(&mut self, index: usize) {
        self.drag_over_index = Some(index);
    }

    pub fn drag_over_index(&self) -> Option<usize> {
        self.drag_over_index
    }

    /// Clears drag state. Called on every drag end, dropped or not.
    pub fn end_drag(&mut self) {
        self.drag_source = None;
        self.drag_over_index = None;
    }

    /// Resolves a drop onto position `index`: a toolbar source inserts a
    /// fresh block there, an existing-block source moves it there. Drag state
    /// is cleared unconditionally afterwards.
    pub fn drop_at(&mut self, index: usize) {
        match self.drag_source.take() {
            Some(DragSource::NewBlock(kind)) => {
                let block = Block::new(kind);
                self.active_block_id = Some(block.id.clone());
                let index = index.min(self.blocks.len());
                self.blocks.insert(index, block);
                self.renumber();
                self.notify();
            }
            Some(DragSource::Existing(id)) => {
                if let Some(from) = self.blocks.iter().position(|b| b.id == id) {
                    self.move_block(from, index);
                }
            }
            None => {}
        }
        self.end_drag();
    }

    /// Adds a blank question (two empty options, first marked correct) to the
    /// given quiz block. No-op if the block is missing or not a quiz.
    pub fn add_question(&mut self, block_id: &str) {
        self.with_quiz(block_id, |questions| {
            questions.push(QuizQuestion::new());
            true
        });
    }

    /// Removes a question by id. No-op if nothing matches.
    pub fn remove_question(&mut self, block_id: &str, question_id: &str) {
        self.with_quiz(block_id, |questions| {
            let before = questions.len();
            questions.retain(|q| q.id != question_id);
            questions.len() != before
        });
    }

    /// Replaces a question by id within the quiz block.
    pub fn update_question(&mut self, block_id: &str, updated: QuizQuestion) {
        self.with_quiz(block_id, |questions| {
            match questions.iter_mut().find(|q| q.id == updated.id) {
                Some(existing) => {
                    *existing = updated;
                    true
                }
                None => false,
            }
        });
    }

    /// Appends one empty option to a question.
    pub fn add_option(&mut self, block_id: &str, question_id: &str) {
        self.with_quiz(block_id, |questions| {
            match questions.iter_mut().find(|q| q.id == question_id) {
                Some(question) => {
                    question.options.push(String::new());
                    true
                }
                None => false,
            }
        });
    }

    /// Rewrites one option's text.
    pub fn update_option(&mut self, block_id: &str, question_id: &str, index: usize, text: &str) {
        self.with_quiz(block_id, |questions| {
            match questions
                .iter_mut()
                .find(|q| q.id == question_id)
                .and_then(|q| q.options.get_mut(index))
            {
                Some(option) => {
                    *option = text.to_string();
                    true
                }
                None => false,
            }
        });
    }

    /// Marks an option as the correct answer.
    pub fn set_correct_option(&mut self, block_id: &str, question_id: &str, index: usize) {
        self.with_quiz(block_id, |questions| {
            match questions.iter_mut().find(|q| q.id == question_id) {
                Some(question) if index < question.options.len() => {
                    question.correct_option_index = index;
                    true
                }
                _ => false,
            }
        });
    }

    /// Removes one option from a question.
    ///
    /// Rejected (no-op) when the question would drop below two options. When
    /// the removed index is at or before the correct one, the correct index
    /// decrements (clamped at 0) so it keeps pointing at the same logical
    /// answer where possible.
    pub fn remove_option(&mut self, block_id: &str, question_id: &str, index: usize) {
        self.with_quiz(block_id, |questions| {
            match questions.iter_mut().find(|q| q.id == question_id) {
                Some(question) if question.options.len() > 2 && index < question.options.len() => {
                    question.options.remove(index);
                    if question.correct_option_index >= index {
                        question.correct_option_index =
                            question.correct_option_index.saturating_sub(1);
                    }
                    true
                }
                _ => false,
            }
        });
    }

    /// Runs `edit` over the question list of the given quiz block and
    /// notifies if it reports a change.
    fn with_quiz(&mut self, block_id: &str, edit: impl FnOnce(&mut Vec<QuizQuestion>) -> bool) {
        let questions = self
            .blocks
            .iter_mut()
            .find(|b| b.id == block_id)
            .and_then(|b| match &mut b.body {
                BlockBody::Known(BlockData::Quiz { questions }) => Some(questions),
                _ => None,
            });
        let Some(questions) = questions else {
            return;
        };
        if edit(questions) {
            self.notify();
        }
    }

    fn renumber(&mut self) {
        for (index, block) in self.blocks.iter_mut().enumerate() {
            block.order = index;
        }
    }

    fn notify(&mut self) {
        if let Some(listener) = self.on_change.as_mut() {
            listener(&self.blocks);
        }
    }
}
