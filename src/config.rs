use std::time::Duration;

use crate::error::ValidationError;
use crate::models::setup::ExamSetup;

/// 题目数量允许的最小值
pub const MIN_QUESTION_COUNT: usize = 1;
/// 题目数量允许的最大值
pub const MAX_QUESTION_COUNT: usize = 231;
/// 每题时间上限（秒）
pub const MAX_TIME_PER_QUESTION_SECS: u64 = 60 * 60;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 考试标题
    pub exam_title: String,
    /// 题库表格链接
    pub sheet_url: String,
    /// 考试设置文件（TOML）
    pub setup_file: String,
    /// 成绩报告输出文件
    pub result_file: String,
    /// 问卷定义 JSON 输出文件（为空则不输出）
    pub survey_json_file: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 拉取表格的超时时间（秒）
    pub fetch_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exam_title: "OCP Test".to_string(),
            sheet_url: "https://docs.google.com/spreadsheets/d/1UvH8jHZu3mLjZv-gJaMIZOXlwkOBm_pnZrCUsW9f1Mk/edit#gid=0".to_string(),
            setup_file: "exam_setup.toml".to_string(),
            result_file: "quiz_result.tsv".to_string(),
            survey_json_file: None,
            verbose_logging: false,
            fetch_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            exam_title: std::env::var("EXAM_TITLE").unwrap_or(default.exam_title),
            sheet_url: std::env::var("SHEET_URL").unwrap_or(default.sheet_url),
            setup_file: std::env::var("SETUP_FILE").unwrap_or(default.setup_file),
            result_file: std::env::var("RESULT_FILE").unwrap_or(default.result_file),
            survey_json_file: std::env::var("SURVEY_JSON_FILE").ok().filter(|v| !v.is_empty()).or(default.survey_json_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            fetch_timeout_secs: std::env::var("FETCH_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.fetch_timeout_secs),
        }
    }
}

/// 题目来源过滤条件
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum SourceFilter {
    /// 全部题目
    #[default]
    All,
    /// 指定章节（B 列）
    Chapter(String),
    /// 用户手写的 where 条件
    Explicit(String),
}

/// 考试配置
///
/// 由默认值构造，可被设置步骤覆盖一次，之后在整个会话中只读。
#[derive(Clone, Debug, PartialEq)]
pub struct ExamConfig {
    /// 题目来源
    pub source_filter: SourceFilter,
    /// 抽取题目数量（None 表示全部）
    pub records_count: Option<usize>,
    /// 是否打乱题目顺序
    pub questions_random_order: bool,
    /// 是否打乱选项顺序
    pub answers_random_order: bool,
    /// true: 先打乱再截取（随机抽样）；false: 先截取前 N 道再打乱
    pub limit_records_after_shuffling: bool,
    /// 每道题的时间
    pub time_per_question: Duration,
    /// 严格模式：答错不能进入下一页
    pub prevent_page_change_on_incorrect: bool,
    /// 是否允许"结束考试"
    pub allow_stop: bool,
    /// 选项文本是否用 <pre> 包裹
    pub insert_pre: bool,
    /// 是否排除没有填完的题目
    pub exclude_unfilled_questions: bool,
    /// 是否先运行设置步骤
    pub initialization: bool,
    /// 是否启用快捷键
    pub use_hotkeys: bool,
    /// 是否为每页生成导航标签
    pub navigation_toc: bool,
}

impl Default for ExamConfig {
    fn default() -> Self {
        Self {
            source_filter: SourceFilter::All,
            records_count: Some(50),
            questions_random_order: true,
            answers_random_order: true,
            limit_records_after_shuffling: true,
            time_per_question: Duration::from_secs(90 * 60 / 50),
            prevent_page_change_on_incorrect: true,
            allow_stop: false,
            insert_pre: true,
            exclude_unfilled_questions: true,
            initialization: true,
            use_hotkeys: true,
            navigation_toc: false,
        }
    }
}

impl ExamConfig {
    /// 用设置步骤的结果生成新的配置
    ///
    /// 校验失败时返回 `ValidationError`，原配置保持不变。
    pub fn apply_setup(&self, setup: &ExamSetup) -> Result<ExamConfig, ValidationError> {
        setup.validate()?;

        let mut config = self.clone();
        if let Some(shuffle) = setup.shuffle {
            config.questions_random_order = shuffle;
        }
        if let Some(shuffle_answers) = setup.shuffle_answers {
            config.answers_random_order = shuffle_answers;
        }
        if let Some(test_mode) = setup.test_mode {
            config.prevent_page_change_on_incorrect = !test_mode;
        }
        if let Some(count) = setup.question_count {
            config.records_count = Some(count);
        }
        if let Some(allow_stop) = setup.allow_stop {
            config.allow_stop = allow_stop;
        }
        if let Some(secs) = setup.time_per_question_secs {
            config.time_per_question = Duration::from_secs(secs);
        }

        config.source_filter = setup.source_filter();
        Ok(config)
    }

    /// 实际请求时使用的 fetch size 提示
    ///
    /// 只有"先截取后打乱"时才在数据源处截取前 N 条。
    pub fn fetch_size_hint(&self) -> Option<usize> {
        if self.limit_records_after_shuffling {
            None
        } else {
            self.records_count
        }
    }
}
