//! 终端运行器 - 编排层
//!
//! 从标准输入逐行读取按键或命令，转换成 `ExamEvent` 交给状态机。
//! 总时长由 tokio 计时器控制，到时产生 `TimeExpired`。
//!
//! 命令：`next` / `back` / `stop` / `toggle <value>` / `why <理由>`，
//! 启用快捷键时还可以输入 `1..9`、`0`、`a..h`，直接回车等于下一页。

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::models::question::QuestionPage;
use crate::services::hotkeys::{choice_for, parse_key, KeyAction};
use crate::services::option_splitter::del_pre;
use crate::workflow::{Decision, ExamEvent, ExamFlowController, Rejection};

/// 运行考试直到结束或输入关闭
///
/// 返回控制器，由调用方判断是否已经完成。
pub async fn run_in_terminal(
    mut controller: ExamFlowController,
    use_hotkeys: bool,
) -> AppResult<ExamFlowController> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let deadline = tokio::time::sleep(controller.session().remaining());
    tokio::pin!(deadline);

    print_help(use_hotkeys);
    let mut shown = None;

    while !controller.is_completed() {
        controller.page_shown();
        if shown != Some(controller.current_page()) {
            render_page(&controller);
            shown = Some(controller.current_page());
        }

        tokio::select! {
            _ = &mut deadline => {
                controller.dispatch(ExamEvent::TimeExpired);
            }
            line = lines.next_line() => {
                let Some(line) = line.map_err(|e| AppError::io_failed("stdin", e))? else {
                    warn!("⚠️ 标准输入已关闭");
                    break;
                };

                let event = controller
                    .session()
                    .current_page()
                    .and_then(|page| parse_command(&line, page, use_hotkeys));
                let Some(event) = event else {
                    println!("无法识别的输入: {}", line.trim());
                    continue;
                };

                debug!("事件: {:?}", event);
                let is_toggle = matches!(event, ExamEvent::Toggle(_));
                let decision = controller.dispatch(event);
                show_decision(&controller, decision, is_toggle);
            }
        }
    }

    Ok(controller)
}

/// 把一行输入转换成事件，无法识别时返回 None
pub fn parse_command(line: &str, page: &QuestionPage, use_hotkeys: bool) -> Option<ExamEvent> {
    let line = line.trim();

    if let Some(text) = line.strip_prefix("why ") {
        return Some(ExamEvent::Explain(text.trim().to_string()));
    }
    if let Some(value) = line.strip_prefix("toggle ") {
        return Some(ExamEvent::Toggle(value.trim().to_string()));
    }
    match line {
        "next" => return Some(ExamEvent::Advance),
        "back" => return Some(ExamEvent::Back),
        "stop" => return Some(ExamEvent::Stop),
        _ => {}
    }

    if !use_hotkeys {
        return None;
    }

    let key = if line.is_empty() { "enter" } else { line };
    match parse_key(key)? {
        KeyAction::Advance => Some(ExamEvent::Advance),
        KeyAction::Back => Some(ExamEvent::Back),
        action => choice_for(page, action).map(ExamEvent::Toggle),
    }
}

fn print_help(use_hotkeys: bool) {
    println!("命令: next | back | stop | toggle <选项> | why <理由>");
    if use_hotkeys {
        println!("快捷键: 1-9/0 按位置选择, a-h 按字母选择, 回车下一页, backspace 上一页");
    }
}

fn render_page(controller: &ExamFlowController) {
    let session = controller.session();
    let Some(page) = session.current_page() else {
        return;
    };

    println!(
        "\n[{}/{}] {}  剩余 {} / {}",
        session.current_index() + 1,
        session.page_count(),
        page.id,
        format_clock(session.remaining()),
        format_clock(session.time_budget())
    );
    println!("{}", page.title);
    for (idx, option) in page.options.iter().enumerate() {
        println!("  {}) {}", idx + 1, del_pre(&option.text));
    }

    let selected = session.answer(session.current_index());
    if !selected.is_empty() {
        println!("已选: {}", selected.join(","));
    }
}

/// 分:秒
fn format_clock(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn show_decision(controller: &ExamFlowController, decision: Decision, is_toggle: bool) {
    match decision {
        Decision::Accepted if is_toggle => {
            let session = controller.session();
            println!("已选: {}", session.answer(session.current_index()).join(","));
        }
        Decision::Accepted | Decision::Completed => {}
        Decision::Rejected(Rejection::IncorrectAnswer { .. }) => {
            println!("✗ 答案不正确。可以用 why <理由> 写下思路，然后重新选择");
        }
        Decision::Rejected(Rejection::UnknownOption) => println!("没有这个选项"),
        Decision::Rejected(Rejection::AtFirstPage) => println!("已经是第一题"),
        Decision::Rejected(Rejection::StopDisabled) => println!("本次考试不允许提前结束"),
        Decision::Rejected(Rejection::AlreadyCompleted) => println!("考试已结束"),
    }
}
