//! 选项拆分服务 - 业务能力层
//!
//! 把一个单元格里的选项文本拆成有序的 `AnswerOption` 列表。支持两种写法：
//!
//! - 字母前缀：`A. Paris B. Rome C. Berlin`
//! - 每行一个选项，行首两个字符是标签：`a) Paris\nb) Rome`

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::debug;

use crate::config::ExamConfig;
use crate::error::ResolutionError;
use crate::models::question::AnswerOption;

const PRE_OPEN: &str = "<pre>";
const PRE_CLOSE: &str = "</pre>";

/// 字母标签只认 A-H，且必须位于开头或空白之后
fn label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|\s)([A-H])\.").expect("静态正则表达式"))
}

/// 用等宽标记包裹选项文本
pub fn add_pre(text: &str) -> String {
    format!("{PRE_OPEN}{text}{PRE_CLOSE}")
}

/// 去掉 `add_pre` 加上的标记，没有标记时原样返回
pub fn del_pre(text: &str) -> &str {
    text.strip_prefix(PRE_OPEN)
        .and_then(|s| s.strip_suffix(PRE_CLOSE))
        .unwrap_or(text)
}

/// 选项拆分服务
pub struct AnswerOptionSplitter {
    insert_pre: bool,
    shuffle: bool,
}

impl AnswerOptionSplitter {
    pub fn new(config: &ExamConfig) -> Self {
        Self {
            insert_pre: config.insert_pre,
            shuffle: config.answers_random_order,
        }
    }

    /// 拆分选项，按配置打乱顺序
    pub fn split_with_rng<R: Rng + ?Sized>(
        &self,
        variants: &str,
        rng: &mut R,
    ) -> Result<Vec<AnswerOption>, ResolutionError> {
        let mut options = self.split(variants)?;
        if self.shuffle {
            options.shuffle(rng);
        }
        Ok(options)
    }

    /// 拆分选项，保持原始顺序
    pub fn split(&self, variants: &str) -> Result<Vec<AnswerOption>, ResolutionError> {
        let raw = match split_letter_prefixed(variants) {
            Some(options) => options,
            None => split_by_lines(variants)?,
        };

        if raw.len() < 2 {
            return Err(malformed(variants, format!("只找到 {} 个选项", raw.len())));
        }

        let mut seen = HashSet::new();
        for (value, _) in &raw {
            if !seen.insert(value.as_str()) {
                return Err(malformed(variants, format!("选项标签 {} 重复", value)));
            }
        }

        debug!("拆分出 {} 个选项", raw.len());

        Ok(raw
            .into_iter()
            .map(|(value, text)| {
                let text = if self.insert_pre { add_pre(&text) } else { text };
                AnswerOption { value, text }
            })
            .collect())
    }
}

fn malformed(variants: &str, reason: String) -> ResolutionError {
    ResolutionError::MalformedVariants {
        variants: variants.to_string(),
        reason,
    }
}

/// 字母前缀写法
///
/// 标签必须按 A、B、C… 依次出现，选项正文里像 "Plan C." 这样的片段
/// 只有在恰好是下一个期望字母时才会被当成分隔符。第一个标签之前不能有正文。
fn split_letter_prefixed(variants: &str) -> Option<Vec<(String, String)>> {
    let mut starts: Vec<(usize, char)> = Vec::new();
    let mut expected = 'A';

    for caps in label_regex().captures_iter(variants) {
        let label = caps.get(1)?;
        let letter = label.as_str().chars().next()?;
        if letter == expected {
            starts.push((label.start(), letter));
            expected = (expected as u8 + 1) as char;
        }
    }

    let (first_start, _) = *starts.first()?;
    if starts.len() < 2 || !variants[..first_start].trim().is_empty() {
        return None;
    }

    let options = starts
        .iter()
        .enumerate()
        .map(|(i, &(start, letter))| {
            let end = starts.get(i + 1).map_or(variants.len(), |&(next, _)| next);
            (letter.to_string(), variants[start..end].trim_end().to_string())
        })
        .collect();

    Some(options)
}

/// 每行一个选项，行首两个字符是标签
fn split_by_lines(variants: &str) -> Result<Vec<(String, String)>, ResolutionError> {
    variants
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let label: String = line.chars().take(2).collect();
            let value: String = label.chars().filter(|c| c.is_alphanumeric()).collect();
            if value.is_empty() {
                Err(malformed(variants, format!("无法识别选项标签: {}", line)))
            } else {
                Ok((value, line.to_string()))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn splitter(insert_pre: bool, shuffle: bool) -> AnswerOptionSplitter {
        AnswerOptionSplitter {
            insert_pre,
            shuffle,
        }
    }

    fn values(options: &[AnswerOption]) -> Vec<&str> {
        options.iter().map(|o| o.value.as_str()).collect()
    }

    #[test]
    fn test_letter_prefixed() {
        let options = splitter(false, false)
            .split("A. Paris B. Rome C. Berlin")
            .unwrap();

        assert_eq!(values(&options), vec!["A", "B", "C"]);
        assert_eq!(options[0].text, "A. Paris");
        assert_eq!(options[2].text, "C. Berlin");
    }

    #[test]
    fn test_letter_prefixed_with_pre() {
        let options = splitter(true, false).split("A. x = 1; B. x = 2;").unwrap();
        assert_eq!(options[0].text, "<pre>A. x = 1;</pre>");
        assert_eq!(del_pre(&options[1].text), "B. x = 2;");
    }

    #[test]
    fn test_delimiter_lookalikes_stay_in_text() {
        // "DATA." 和 "java.util" 不能被当成分隔符，"Plan B." 出现在 B 之后也不会
        let options = splitter(false, false)
            .split("A. Read DATA. from java.util.List B. Use Plan A. first C. None")
            .unwrap();

        assert_eq!(values(&options), vec!["A", "B", "C"]);
        assert_eq!(options[0].text, "A. Read DATA. from java.util.List");
        assert_eq!(options[1].text, "B. Use Plan A. first");
    }

    #[test]
    fn test_multiline_letter_prefixed() {
        let options = splitter(false, false)
            .split("A. first line\ncontinues\nB. second\nC. third\nD. fourth")
            .unwrap();
        assert_eq!(values(&options), vec!["A", "B", "C", "D"]);
        assert_eq!(options[0].text, "A. first line\ncontinues");
    }

    #[test]
    fn test_newline_delimited() {
        let options = splitter(false, false)
            .split("a) Paris\nb) Rome\n\n  c) Berlin  \n")
            .unwrap();
        assert_eq!(values(&options), vec!["a", "b", "c"]);
        assert_eq!(options[2].text, "c) Berlin");
    }

    #[test]
    fn test_single_option_is_malformed() {
        let err = splitter(false, false).split("A. only one").unwrap_err();
        assert!(matches!(err, ResolutionError::MalformedVariants { .. }));
    }

    #[test]
    fn test_duplicate_labels_are_malformed() {
        let err = splitter(false, false).split("a) one\na) two").unwrap_err();
        assert!(matches!(err, ResolutionError::MalformedVariants { .. }));
    }

    #[test]
    fn test_leading_text_is_not_dropped() {
        // 第一个标签前有正文，退回按行拆分
        let options = splitter(false, false).split("Choose:\nA. one\nB. two").unwrap();
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].text, "Choose:");
    }

    #[test]
    fn test_shuffle_keeps_pairs() {
        let mut rng = StdRng::seed_from_u64(7);
        let options = splitter(true, true)
            .split_with_rng("A. w B. x C. y D. z E. v F. u", &mut rng)
            .unwrap();

        assert_eq!(options.len(), 6);
        for option in &options {
            assert!(del_pre(&option.text).starts_with(&option.value));
        }
        let mut sorted = values(&options);
        sorted.sort();
        assert_eq!(sorted, vec!["A", "B", "C", "D", "E", "F"]);
    }

    #[test]
    fn test_pre_round_trip() {
        for s in ["", "A. Paris", "<pre>nested</pre>", "  spaced  "] {
            assert_eq!(del_pre(&add_pre(s)), s);
        }
        assert_eq!(del_pre("no marker"), "no marker");
    }
}
