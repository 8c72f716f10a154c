//! 问卷定义
//!
//! 交给渲染组件的声明式描述（页面、选项、正确答案、计时、结束提示），
//! 字段名与渲染组件的 JSON 格式一致。

use serde::Serialize;

use crate::models::question::{AnswerOption, QuestionPage};
use crate::services::markdown::markdown_to_html;
use crate::services::question_set::QuestionSet;

/// 每页附带的"说明理由"字段名，不参与计分
pub const REASONING_FIELD: &str = "reasoning";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDefinition {
    pub title: String,
    pub show_progress_bar: &'static str,
    pub show_timer_panel: &'static str,
    /// 总时长（秒）
    pub max_time_to_finish: u64,
    pub completed_html: String,
    pub completed_html_on_condition: Vec<CompletionCondition>,
    pub pages: Vec<SurveyPage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionCondition {
    pub expression: String,
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyPage {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation_description: Option<String>,
    pub elements: Vec<SurveyElement>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SurveyElement {
    #[serde(rename_all = "camelCase")]
    Checkbox {
        name: String,
        title: String,
        choices: Vec<AnswerOption>,
        /// 无法判定时省略
        #[serde(skip_serializing_if = "Vec::is_empty")]
        correct_answer: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Comment {
        name: String,
        title: String,
        visible: bool,
    },
}

impl SurveyDefinition {
    pub fn from_question_set(title: impl Into<String>, set: &QuestionSet) -> Self {
        Self {
            title: title.into(),
            show_progress_bar: "bottom",
            show_timer_panel: "top",
            max_time_to_finish: set.time_budget.as_secs(),
            completed_html: "<h4>You got <b>{correctAnswers}</b> out of <b>{questionCount}</b> correct answers. Question ids with wrong answers are printed to console.</h4>".to_string(),
            completed_html_on_condition: vec![
                CompletionCondition {
                    expression: "{correctAnswers} == 0".to_string(),
                    html: "<h4>Unfortunately, none of your answers is correct. Please try again. Question ids are printed to console.</h4>".to_string(),
                },
                CompletionCondition {
                    expression: "{correctAnswers} == {questionCount}".to_string(),
                    html: "<h4>Congratulations! You answered all the questions correctly!</h4>".to_string(),
                },
            ],
            pages: set.pages.iter().map(SurveyPage::from).collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&QuestionPage> for SurveyPage {
    fn from(page: &QuestionPage) -> Self {
        Self {
            name: page.id.clone(),
            navigation_title: page.navigation_title.clone(),
            navigation_description: page.navigation_description.clone(),
            elements: vec![
                SurveyElement::Checkbox {
                    name: page.id.clone(),
                    title: markdown_to_html(&page.title),
                    choices: page.options.clone(),
                    correct_answer: page.correct_values.clone(),
                },
                SurveyElement::Comment {
                    name: REASONING_FIELD.to_string(),
                    title: "Explain your reasoning".to_string(),
                    visible: false,
                },
            ],
        }
    }
}
