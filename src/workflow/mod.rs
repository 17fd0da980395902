pub mod exam_assembler;
pub mod question_ctx;

pub use exam_assembler::{strip_markers, ExamAssembler};
pub use question_ctx::QuestionCtx;
