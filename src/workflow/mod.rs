pub mod exam_flow;
pub mod exam_session;

pub use exam_flow::{Decision, ExamEvent, ExamFlowController, ExamOutcome, ExamState, Rejection};
pub use exam_session::ExamSession;
