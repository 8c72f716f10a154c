//! 题目集构建服务
//!
//! 原始记录 → 题目页，随后按配置打乱、截取并附加导航信息。

use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::ExamConfig;
use crate::error::ResolutionError;
use crate::models::question::QuestionPage;
use crate::models::raw_row::RawRow;
use crate::services::answer_key::AnswerKeyResolver;
use crate::services::option_splitter::AnswerOptionSplitter;

/// 构建结果
#[derive(Debug, Clone)]
pub struct QuestionSet {
    pub pages: Vec<QuestionPage>,
    /// 考试总时长 = 每题时间 × 题目数
    pub time_budget: Duration,
    /// 选项无法拆分而被跳过的题目
    pub rejected: Vec<(String, ResolutionError)>,
}

impl QuestionSet {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }
}

/// 题目集构建服务
pub struct QuestionSetBuilder<'a> {
    config: &'a ExamConfig,
    splitter: AnswerOptionSplitter,
    resolver: AnswerKeyResolver,
}

impl<'a> QuestionSetBuilder<'a> {
    pub fn new(config: &'a ExamConfig) -> Self {
        Self {
            config,
            splitter: AnswerOptionSplitter::new(config),
            resolver: AnswerKeyResolver::new(),
        }
    }

    /// 使用线程随机数生成器构建
    pub fn build(&self, rows: Vec<RawRow>) -> QuestionSet {
        self.build_with_rng(rows, &mut rand::rng())
    }

    pub fn build_with_rng<R: Rng + ?Sized>(&self, rows: Vec<RawRow>, rng: &mut R) -> QuestionSet {
        let total_rows = rows.len();
        let mut rejected = Vec::new();
        let mut pages = Vec::with_capacity(total_rows);

        for row in rows {
            match self.build_page(&row, rng) {
                Ok(page) => pages.push(page),
                Err(e) => {
                    error!("[题目 {}] 跳过: {}", row.question_id, e);
                    rejected.push((row.question_id, e));
                }
            }
        }

        let pages = self.apply_order_policy(pages, rng);
        let pages = self.attach_navigation(pages);

        let time_budget = total_time(self.config.time_per_question, pages.len());

        info!(
            "✓ 题目集构建完成: {} 条记录 → {} 道题 (跳过 {})",
            total_rows,
            pages.len(),
            rejected.len()
        );

        QuestionSet {
            pages,
            time_budget,
            rejected,
        }
    }

    /// 单道题的构建，选项无法拆分时返回错误；答案键无法解析只记录日志
    fn build_page<R: Rng + ?Sized>(
        &self,
        row: &RawRow,
        rng: &mut R,
    ) -> Result<QuestionPage, ResolutionError> {
        let options = self.splitter.split_with_rng(&row.variants, rng)?;

        let correct_values = self.resolver.resolve(&row.answer_key, &options);
        if correct_values.is_empty() {
            error!(
                "[题目 {}] 答案 {} 无法匹配选项，本题没有可判定的正确答案",
                row.question_id, row.answer_key
            );
        }

        Ok(QuestionPage {
            id: row.question_id.clone(),
            title: title_with_image(&row.question_text, row.image_url.as_deref()),
            topic: row.topic.clone(),
            chapter: row.chapter.clone(),
            options,
            correct_values,
            navigation_title: None,
            navigation_description: None,
        })
    }

    /// 打乱与截取
    ///
    /// 先打乱后截取得到随机抽样；否则先取前 N 道再打乱。
    fn apply_order_policy<R: Rng + ?Sized>(
        &self,
        mut pages: Vec<QuestionPage>,
        rng: &mut R,
    ) -> Vec<QuestionPage> {
        let limit_after = self.config.limit_records_after_shuffling;

        if !limit_after {
            self.truncate(&mut pages);
        }
        if self.config.questions_random_order {
            pages.shuffle(rng);
        }
        if limit_after {
            self.truncate(&mut pages);
        }

        pages
    }

    fn truncate(&self, pages: &mut Vec<QuestionPage>) {
        if let Some(limit) = self.config.records_count {
            if pages.len() > limit {
                debug!("截取前 {} 道题 (共 {})", limit, pages.len());
                pages.truncate(limit);
            }
        }
    }

    fn attach_navigation(&self, mut pages: Vec<QuestionPage>) -> Vec<QuestionPage> {
        if self.config.navigation_toc {
            for (idx, page) in pages.iter_mut().enumerate() {
                page.navigation_title = Some((idx + 1).to_string());
                page.navigation_description = Some(page.id.clone());
            }
        }
        pages
    }
}

/// 考试总时长，溢出时取 `Duration::MAX`
fn total_time(per_question: Duration, count: usize) -> Duration {
    u32::try_from(count)
        .ok()
        .and_then(|n| per_question.checked_mul(n))
        .unwrap_or(Duration::MAX)
}

/// 有图片时把 <img> 放在题干前面
fn title_with_image(text: &str, image_url: Option<&str>) -> String {
    match image_url {
        Some(url) => format!("<img src=\"{}\"> {}", url.replace('"', "&quot;"), text),
        None => text.to_string(),
    }
}
