pub mod answer_key;
pub mod hotkeys;
pub mod markdown;
pub mod option_splitter;
pub mod question_set;
pub mod report_writer;
pub mod score_reporter;
pub mod survey_definition;

pub use answer_key::AnswerKeyResolver;
pub use option_splitter::AnswerOptionSplitter;
pub use question_set::{QuestionSet, QuestionSetBuilder};
pub use report_writer::{ClipboardSink, ReportFileWriter};
pub use score_reporter::{ExamReport, ScoreReporter, ScoreSummary};
pub use survey_definition::SurveyDefinition;
