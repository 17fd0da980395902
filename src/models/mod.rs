pub mod document;
pub mod loaders;
pub mod question;

pub use document::{QuestionDocument, Segment};
pub use loaders::{load_question_source, load_question_sources};
pub use question::{AnswerEntry, QuestionSource, RenderedExam, WrittenExam, CORRECT_MARKER};
