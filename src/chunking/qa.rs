//! Question/answer chunking state machine.
//!
//! Each chunk opens on a `Q:` line, picks up the `A:` line and the answer text that
//! follows it, and closes on the first blank line after the answer, on the next
//! `Q:` line, or at end of input. Stray lines never cause an error: inside an open
//! chunk they are absorbed, outside one they are dropped.

use super::{Chunk, Chunker};
use crate::source::normalize_newlines;

/// Trimmed prefix that opens a question.
pub const QUESTION_MARKER: &str = "Q:";

/// Trimmed prefix that opens an answer.
pub const ANSWER_MARKER: &str = "A:";

/// Where the scanner is relative to the current chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChunkState {
    /// No chunk open.
    #[default]
    Idle,
    /// A question line was seen, no answer yet.
    InQuestion,
    /// Inside the answer paragraph.
    InAnswer,
}

/// Classification of a single input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Question,
    Answer,
    Blank,
    Text,
}

impl LineKind {
    pub fn of(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.starts_with(QUESTION_MARKER) {
            LineKind::Question
        } else if trimmed.starts_with(ANSWER_MARKER) {
            LineKind::Answer
        } else if trimmed.is_empty() {
            LineKind::Blank
        } else {
            LineKind::Text
        }
    }
}

/// What to do with the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Flush the pending chunk, then open a new one with this line.
    Start,
    /// Add the line to the open chunk.
    Append,
    /// Close the open chunk; the line itself is not kept.
    Flush,
    /// Drop the line.
    Ignore,
}

impl ChunkState {
    /// Transition table for one line.
    pub fn next(self, kind: LineKind) -> (Action, ChunkState) {
        use ChunkState::*;
        use LineKind::*;

        match (self, kind) {
            (_, Question) => (Action::Start, InQuestion),
            (Idle, _) => (Action::Ignore, Idle),
            (InQuestion, Answer) => (Action::Append, InAnswer),
            // Multi-line questions: extra text before the answer stays with the question.
            (InQuestion, Text) => (Action::Append, InQuestion),
            (InQuestion, Blank) => (Action::Ignore, InQuestion),
            (InAnswer, Blank) => (Action::Flush, Idle),
            (InAnswer, Answer | Text) => (Action::Append, InAnswer),
        }
    }
}

/// Accumulates lines for the open chunk and collects finished chunks.
#[derive(Debug, Default)]
struct Segmenter<'a> {
    state: ChunkState,
    pending: Vec<&'a str>,
    chunks: Vec<Chunk>,
}

impl<'a> Segmenter<'a> {
    fn feed(&mut self, line: &'a str) {
        let (action, next) = self.state.next(LineKind::of(line));
        match action {
            Action::Start => {
                self.flush();
                self.pending.push(line);
            }
            Action::Append => self.pending.push(line),
            Action::Flush => self.flush(),
            Action::Ignore => {}
        }
        self.state = next;
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let text = self.pending.join("\n");
        self.pending.clear();

        let text = text.trim();
        if !text.is_empty() {
            let order = self.chunks.len();
            self.chunks.push(Chunk::new(text.to_string(), order));
        }
    }

    fn finish(mut self) -> Vec<Chunk> {
        self.flush();
        self.chunks
    }
}

/// Chunker for `Q:` / `A:` formatted transcripts.
#[derive(Debug, Clone, Copy, Default)]
pub struct QaChunker;

impl QaChunker {
    pub fn new() -> Self {
        Self
    }
}

impl Chunker for QaChunker {
    fn segment(&self, document: &str) -> Vec<Chunk> {
        let document = normalize_newlines(document);
        let mut segmenter = Segmenter::default();
        for line in document.split('\n') {
            segmenter.feed(line);
        }
        segmenter.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::segment;

    fn texts(document: &str) -> Vec<String> {
        segment(document)
    }

    #[test]
    fn test_two_pairs() {
        let chunks = texts("Q: What color?\nA: Blue.\n\nQ: How many?\nA: Three.\n");
        assert_eq!(chunks, vec!["Q: What color?\nA: Blue.", "Q: How many?\nA: Three."]);
    }

    #[test]
    fn test_orders_follow_insertion() {
        let chunks = QaChunker::new().segment("Q: a\nA: 1\n\nQ: b\nA: 2\n\nQ: c\nA: 3");
        let orders: Vec<usize> = chunks.iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(chunks[2].text, "Q: c\nA: 3");
    }

    #[test]
    fn test_no_markers_yields_nothing() {
        assert!(texts("Chapter one.\n\nIt was a dark night.\nA: stray answer\n").is_empty());
        assert!(texts("").is_empty());
    }

    #[test]
    fn test_every_chunk_starts_with_question() {
        let doc = "Preface text\nQ: First?\nA: One.\nmore answer\n\nnoise between\nQ: Second?\nQ: Third?\nA: Three.\n";
        let chunks = texts(doc);
        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert!(chunk.trim_start().starts_with(QUESTION_MARKER), "{chunk:?}");
        }
    }

    #[test]
    fn test_multiline_answer_and_next_question_closes() {
        let chunks = texts("Q: Why?\nA: Because\nit is\nQ: Next?\nA: Sure.");
        assert_eq!(chunks, vec!["Q: Why?\nA: Because\nit is", "Q: Next?\nA: Sure."]);
    }

    #[test]
    fn test_question_text_before_answer_is_absorbed() {
        let chunks = texts("Q: What is the name\nof the second ship?\nA: The Gull.\n");
        assert_eq!(chunks, vec!["Q: What is the name\nof the second ship?\nA: The Gull."]);
    }

    #[test]
    fn test_blank_inside_question_is_dropped() {
        let chunks = texts("Q: Long question\n\ncontinued\nA: Answer.\n");
        assert_eq!(chunks, vec!["Q: Long question\ncontinued\nA: Answer."]);
    }

    #[test]
    fn test_unanswered_question_flushes_at_end() {
        assert_eq!(texts("Q: Only a question?"), vec!["Q: Only a question?"]);
    }

    #[test]
    fn test_lines_after_answer_paragraph_are_dropped() {
        let chunks = texts("Q: a?\nA: b.\n\ntrailing commentary\n\nQ: c?\nA: d.\n");
        assert_eq!(chunks, vec!["Q: a?\nA: b.", "Q: c?\nA: d."]);
    }

    #[test]
    fn test_second_answer_line_stays_in_answer() {
        let chunks = texts("Q: a?\nA: first\nA: second\n\n");
        assert_eq!(chunks, vec!["Q: a?\nA: first\nA: second"]);
    }

    #[test]
    fn test_indented_markers_and_crlf() {
        let chunks = texts("  Q: Indented?\r\n   A: Yes.\r\n\r\nQ: Next?\r\nA: No.\r\n");
        assert_eq!(chunks, vec!["Q: Indented?\n   A: Yes.", "Q: Next?\nA: No."]);
    }

    #[test]
    fn test_resegmenting_is_stable() {
        let doc = "intro\nQ: a?\nextra q\nA: 1\n  more\n\nQ: b?\nQ: c?\nA: 3\nA: 4\n\n\nQ: d?";
        let first = texts(doc);
        let second = texts(&first.join("\n\n"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_transition_table() {
        use ChunkState::*;
        assert_eq!(Idle.next(LineKind::Question), (Action::Start, InQuestion));
        assert_eq!(InAnswer.next(LineKind::Question), (Action::Start, InQuestion));
        assert_eq!(InQuestion.next(LineKind::Question), (Action::Start, InQuestion));
        assert_eq!(InQuestion.next(LineKind::Answer), (Action::Append, InAnswer));
        assert_eq!(InQuestion.next(LineKind::Text), (Action::Append, InQuestion));
        assert_eq!(InAnswer.next(LineKind::Blank), (Action::Flush, Idle));
        assert_eq!(InAnswer.next(LineKind::Text), (Action::Append, InAnswer));
        assert_eq!(Idle.next(LineKind::Answer), (Action::Ignore, Idle));
        assert_eq!(Idle.next(LineKind::Text), (Action::Ignore, Idle));
    }

    #[test]
    fn test_line_kind() {
        assert_eq!(LineKind::of("  Q: hi"), LineKind::Question);
        assert_eq!(LineKind::of("A:"), LineKind::Answer);
        assert_eq!(LineKind::of(" \t "), LineKind::Blank);
        assert_eq!(LineKind::of("Quiet"), LineKind::Text);
    }
}
