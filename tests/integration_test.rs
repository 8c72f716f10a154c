use sheet_exam::clients::SheetSource;
use sheet_exam::config::{Config, ExamConfig, SourceFilter};
use sheet_exam::error::{AppError, AppResult, FetchError, ValidationError};
use sheet_exam::orchestrator::{finish_exam, prepare_exam};
use sheet_exam::services::ClipboardSink;
use sheet_exam::utils::logging;
use sheet_exam::workflow::{Decision, ExamEvent, Rejection};
use sheet_exam::SheetClient;
use std::future::Future;
use std::sync::Mutex;

/// 内存中的表格
struct FakeSheet {
    chapters: Vec<Vec<String>>,
    questions: Vec<Vec<String>>,
    fail: bool,
    queries: Mutex<Vec<(String, Option<usize>)>>,
}

impl FakeSheet {
    fn new(questions: Vec<Vec<String>>) -> Self {
        Self {
            chapters: vec![cells(&["OCP", "Chapter 1", "2"]), cells(&["OCP", "Chapter 2", "12.0"])],
            questions,
            fail: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    fn queries(&self) -> Vec<(String, Option<usize>)> {
        self.queries.lock().unwrap().clone()
    }
}

impl SheetSource for FakeSheet {
    fn query(
        &self,
        query: &str,
        fetch_size: Option<usize>,
    ) -> impl Future<Output = AppResult<Vec<Vec<String>>>> + Send {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), fetch_size));

        let result = if self.fail {
            Err(FetchError::BadStatus {
                endpoint: "fake".to_string(),
                status: 500,
            }
            .into())
        } else if query.contains("count(C)") {
            Ok(self.chapters.clone())
        } else {
            Ok(self.questions.clone())
        };
        std::future::ready(result)
    }
}

/// 记录写入内容的剪贴板
#[derive(Default)]
struct RecordingSink {
    texts: Mutex<Vec<String>>,
}

impl ClipboardSink for RecordingSink {
    fn write_text(&self, text: &str) -> AppResult<()> {
        self.texts.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

fn cells(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn question_rows() -> Vec<Vec<String>> {
    vec![
        cells(&[
            "OCP",
            "Chapter 1",
            "C1Q1",
            "Which is a **reserved** word?",
            "A. goto\nB. main\nC. String",
            "A",
        ]),
        cells(&["OCP", "Chapter 1", "C1Q2", "Pick two", "A. x B. y C. z", "A,C", "", ""]),
        // 列数不足
        cells(&["OCP", "Chapter 1"]),
        // 只有一个选项
        cells(&["OCP", "Chapter 1", "C1Q3", "Broken", "only one", "A"]),
    ]
}

fn ordered_config() -> ExamConfig {
    ExamConfig {
        questions_random_order: false,
        answers_random_order: false,
        initialization: false,
        ..ExamConfig::default()
    }
}

fn temp_setup_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("sheet_exam_{}_{}.toml", name, std::process::id()))
}

#[tokio::test]
async fn test_strict_exam_end_to_end() {
    logging::init();

    let sheet = FakeSheet::new(question_rows());
    let prepared = prepare_exam(&sheet, &Config::default(), &ordered_config())
        .await
        .expect("加载题目失败");

    assert_eq!(prepared.questions.len(), 2);
    assert_eq!(prepared.questions.rejected.len(), 1);
    assert_eq!(prepared.questions.rejected[0].0, "C1Q3");
    assert_eq!(
        prepared.questions.time_budget,
        prepared.config.time_per_question * 2
    );

    let mut controller = prepared.start();

    // 答错，停在第一页并显示理由输入框
    assert_eq!(controller.dispatch(ExamEvent::Toggle("B".to_string())), Decision::Accepted);
    assert_eq!(
        controller.dispatch(ExamEvent::Advance),
        Decision::Rejected(Rejection::IncorrectAnswer { page: 0 })
    );
    assert!(controller.session().is_reasoning_visible(0));
    assert_eq!(
        controller.dispatch(ExamEvent::Explain("main is not reserved".to_string())),
        Decision::Accepted
    );

    // 改正后可以前进
    controller.dispatch(ExamEvent::Toggle("B".to_string()));
    controller.dispatch(ExamEvent::Toggle("A".to_string()));
    assert_eq!(controller.dispatch(ExamEvent::Advance), Decision::Accepted);
    controller.page_shown();
    assert_eq!(controller.current_page(), 1);

    controller.dispatch(ExamEvent::Toggle("A".to_string()));
    controller.dispatch(ExamEvent::Toggle("C".to_string()));
    assert_eq!(controller.dispatch(ExamEvent::Advance), Decision::Completed);

    let outcome = controller.into_outcome().expect("考试应该已经结束");
    let sink = RecordingSink::default();
    let report = finish_exam(&outcome, &sink);

    assert_eq!(report.summary.total, 2);
    assert_eq!(report.summary.correct_count, 1);
    assert_eq!(report.summary.score_percent, 50);
    assert_eq!(report.mistaken_ids(), vec!["C1Q1"]);

    let texts = sink.texts.lock().unwrap();
    assert_eq!(texts.len(), 1);
    let lines: Vec<Vec<&str>> = texts[0].lines().map(|l| l.split('\t').collect()).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(&lines[0][..3], &["C1Q1", "1", "A"]);
    assert_eq!(&lines[1][..3], &["C1Q2", "0", "A,C"]);
    assert_eq!(lines[0][3].len(), "15.10.2026".len());
}

#[tokio::test]
async fn test_setup_file_selects_chapter() {
    let path = temp_setup_path("chapter");
    std::fs::write(
        &path,
        "shuffle = false\nshuffle_answers = false\nquestion_count = 1\nchapter = \"Chapter 1\"\n",
    )
    .unwrap();

    let config = Config {
        setup_file: path.display().to_string(),
        ..Config::default()
    };
    let sheet = FakeSheet::new(question_rows());
    let prepared = prepare_exam(&sheet, &config, &ExamConfig::default())
        .await
        .unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(
        prepared.config.source_filter,
        SourceFilter::Chapter("Chapter 1".to_string())
    );
    assert_eq!(prepared.questions.len(), 1);
    assert_eq!(prepared.questions.pages[0].id, "C1Q1");

    let queries = sheet.queries();
    assert_eq!(queries.len(), 2);
    assert!(queries[0].0.contains("count(C)"));
    assert_eq!(queries[0].1, None);
    assert!(queries[1].0.contains("AND B = 'Chapter 1'"));
    // 先打乱后截取时不在数据源处截取
    assert_eq!(queries[1].1, None);
}

#[tokio::test]
async fn test_invalid_setup_blocks_exam_start() {
    let path = temp_setup_path("invalid");
    std::fs::write(&path, "question_count = 500\nchapter = \"Chapter 2\"\n").unwrap();

    let config = Config {
        setup_file: path.display().to_string(),
        ..Config::default()
    };
    let sheet = FakeSheet::new(question_rows());
    let err = prepare_exam(&sheet, &config, &ExamConfig::default())
        .await
        .unwrap_err();
    let _ = std::fs::remove_file(&path);

    assert!(matches!(
        err,
        AppError::Validation(ValidationError::QuestionCountOutOfRange { value: 500, .. })
    ));
    assert!(!err.is_fatal());
    // 只拉取了章节目录，没有拉取题目
    let queries = sheet.queries();
    assert_eq!(queries.len(), 1);
    assert!(queries[0].0.contains("count(C)"));
}

#[test]
fn test_first_n_passes_fetch_size() {
    let sheet = FakeSheet::new(question_rows());
    let base = ExamConfig {
        limit_records_after_shuffling: false,
        records_count: Some(1),
        ..ordered_config()
    };

    let prepared =
        tokio_test::block_on(prepare_exam(&sheet, &Config::default(), &base)).unwrap();

    assert_eq!(sheet.queries(), vec![(
        "select A,B,C,D,E,F,G,H where C != 'Question' AND D != '' AND E != '' AND F != ''".to_string(),
        Some(1)
    )]);
    assert_eq!(prepared.questions.len(), 1);
}

#[test]
fn test_fetch_failure_is_fatal() {
    let mut sheet = FakeSheet::new(question_rows());
    sheet.fail = true;

    let err = tokio_test::block_on(prepare_exam(&sheet, &Config::default(), &ordered_config()))
        .unwrap_err();

    assert!(err.is_fatal());
    assert!(matches!(err, AppError::Fetch(FetchError::BadStatus { status: 500, .. })));
}

#[tokio::test]
async fn test_time_expired_reports_nothing_answered() {
    let sheet = FakeSheet::new(question_rows());
    let prepared = prepare_exam(&sheet, &Config::default(), &ordered_config())
        .await
        .unwrap();

    let mut controller = prepared.start();
    assert_eq!(controller.dispatch(ExamEvent::TimeExpired), Decision::Completed);
    assert_eq!(
        controller.dispatch(ExamEvent::Advance),
        Decision::Rejected(Rejection::AlreadyCompleted)
    );

    let outcome = controller.into_outcome().unwrap();
    let sink = RecordingSink::default();
    let report = finish_exam(&outcome, &sink);

    assert_eq!(report.summary.skipped_count, 2);
    assert_eq!(report.summary.score_percent, 0);
    assert_eq!(sink.texts.lock().unwrap()[0], "");
    assert!(report
        .summary
        .completion_message()
        .starts_with("Unfortunately"));
}

#[tokio::test]
#[ignore] // 默认忽略，需要网络：cargo test -- --ignored
async fn test_load_public_sheet() {
    logging::init();

    let config = Config::from_env();
    let client = SheetClient::new(&config).expect("表格链接无效");

    let base = ExamConfig {
        initialization: false,
        records_count: Some(5),
        ..ExamConfig::default()
    };
    let prepared = prepare_exam(&client, &config, &base)
        .await
        .expect("加载题目失败");

    println!("加载到 {} 道题", prepared.questions.len());
    assert!(prepared.questions.len() <= 5);
}
