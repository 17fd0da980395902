pub mod question_loader;

pub use question_loader::{is_question_file, load_question_source, load_question_sources};
