pub mod loaders;
pub mod question;
pub mod raw_row;
pub mod setup;

pub use loaders::load_setup_file;
pub use question::{AnswerOption, QuestionPage};
pub use raw_row::{ChapterSummary, RawRow};
pub use setup::ExamSetup;
