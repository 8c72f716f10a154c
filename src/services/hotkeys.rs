//! 快捷键映射
//!
//! 数字选择第 N 个选项，字母选择对应标签的选项，空格/回车前进，退格后退。

use phf::phf_map;

use crate::models::question::QuestionPage;

/// 一个按键对应的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// 按位置选择（从 1 开始）
    SelectPosition(usize),
    /// 按标签首字母选择
    SelectLetter(char),
    /// 下一页，最后一页时交卷
    Advance,
    /// 上一页
    Back,
}

static NAMED_KEYS: phf::Map<&'static str, KeyAction> = phf_map! {
    "space" => KeyAction::Advance,
    "enter" => KeyAction::Advance,
    "backspace" => KeyAction::Back,
};

/// 解析按键名，不认识的按键返回 None
pub fn parse_key(key: &str) -> Option<KeyAction> {
    let key = key.trim().to_ascii_lowercase();
    if let Some(action) = NAMED_KEYS.get(key.as_str()) {
        return Some(*action);
    }

    let mut chars = key.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return None;
    };

    match c {
        '1'..='9' => c.to_digit(10).map(|d| KeyAction::SelectPosition(d as usize)),
        '0' => Some(KeyAction::SelectPosition(10)),
        'a'..='h' => Some(KeyAction::SelectLetter(c)),
        _ => None,
    }
}

/// 找出选择类按键在当前页对应的选项 value
pub fn choice_for(page: &QuestionPage, action: KeyAction) -> Option<String> {
    let option = match action {
        KeyAction::SelectPosition(n) => page.option_at(n),
        KeyAction::SelectLetter(c) => page.option_by_letter(c),
        KeyAction::Advance | KeyAction::Back => None,
    };
    option.map(|o| o.value.clone())
}
