pub mod exam_template;
pub mod exam_writer;
pub mod question_parser;
pub mod randomizer;

pub use exam_template::ExamTemplate;
pub use exam_writer::ExamWriter;
pub use question_parser::parse_question;
pub use randomizer::{randomize, randomize_document};
