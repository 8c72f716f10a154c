//! 答案键解析服务 - 业务能力层
//!
//! 把 "A,C" 这样的答案键映射到选项的 value。
//!
//! 匹配规则：去掉等宽标记并 trim 后，选项文本的第一个字符与答案键中的字母
//! 比较（不区分大小写）。选项被打乱后文本仍以原标签开头，所以结果不受顺序影响。

use tracing::error;

use crate::error::ResolutionError;
use crate::models::question::AnswerOption;
use crate::services::option_splitter::del_pre;

/// 答案键解析服务
#[derive(Debug, Default, Clone, Copy)]
pub struct AnswerKeyResolver;

impl AnswerKeyResolver {
    pub fn new() -> Self {
        Self
    }

    /// 解析答案键，返回与答案键顺序一致的 value 列表
    pub fn try_resolve(
        &self,
        key: &str,
        options: &[AnswerOption],
    ) -> Result<Vec<String>, ResolutionError> {
        let tokens: Vec<&str> = key
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();

        if tokens.is_empty() {
            return Err(ResolutionError::EmptyKey);
        }

        tokens
            .into_iter()
            .map(|token| {
                options
                    .iter()
                    .find(|option| first_char_matches(&option.text, token))
                    .map(|option| option.value.clone())
                    .ok_or_else(|| ResolutionError::UnknownKey {
                        key: key.to_string(),
                        token: token.to_string(),
                        options: options
                            .iter()
                            .map(|o| o.value.as_str())
                            .collect::<Vec<_>>()
                            .join(","),
                    })
            })
            .collect()
    }

    /// 解析答案键，失败时记录错误并返回空列表
    ///
    /// 空列表表示这道题的正确答案无法判定，调用方不应因此中断。
    pub fn resolve(&self, key: &str, options: &[AnswerOption]) -> Vec<String> {
        match self.try_resolve(key, options) {
            Ok(values) => values,
            Err(e) => {
                error!("{}", e);
                Vec::new()
            }
        }
    }
}

/// 比较选项文本的第一个有效字符与答案字母
fn first_char_matches(text: &str, token: &str) -> bool {
    let Some(expected) = token.chars().next() else {
        return false;
    };
    del_pre(text)
        .trim()
        .chars()
        .next()
        .is_some_and(|c| c.to_lowercase().eq(expected.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::option_splitter::add_pre;

    fn options(order: &[&str]) -> Vec<AnswerOption> {
        order
            .iter()
            .map(|v| AnswerOption::new(*v, add_pre(&format!("{}. city {}", v, v))))
            .collect()
    }

    #[test]
    fn test_resolve_single() {
        let resolver = AnswerKeyResolver::new();
        assert_eq!(resolver.resolve("A", &options(&["A", "B", "C"])), vec!["A"]);
    }

    #[test]
    fn test_resolve_independent_of_order() {
        let resolver = AnswerKeyResolver::new();
        let original = resolver.resolve("A, C", &options(&["A", "B", "C"]));
        let shuffled = resolver.resolve("A, C", &options(&["C", "B", "A"]));
        assert_eq!(original, vec!["A", "C"]);
        assert_eq!(shuffled, vec!["A", "C"]);
    }

    #[test]
    fn test_resolve_keeps_key_order_and_case() {
        let resolver = AnswerKeyResolver::new();
        assert_eq!(
            resolver.resolve("c,a", &options(&["B", "A", "C"])),
            vec!["C", "A"]
        );
    }

    #[test]
    fn test_unknown_key_returns_empty() {
        let resolver = AnswerKeyResolver::new();
        assert!(resolver.resolve("Z", &options(&["A", "B", "C"])).is_empty());

        let err = resolver
            .try_resolve("A,Z", &options(&["A", "B", "C"]))
            .unwrap_err();
        assert_eq!(
            err,
            ResolutionError::UnknownKey {
                key: "A,Z".to_string(),
                token: "Z".to_string(),
                options: "A,B,C".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_key() {
        let resolver = AnswerKeyResolver::new();
        assert_eq!(
            resolver.try_resolve(" , ", &options(&["A", "B"])),
            Err(ResolutionError::EmptyKey)
        );
    }

    #[test]
    fn test_unwrapped_text() {
        let resolver = AnswerKeyResolver::new();
        let plain = vec![
            AnswerOption::new("A", "  A. Paris"),
            AnswerOption::new("B", "B. Rome"),
        ];
        assert_eq!(resolver.resolve("b", &plain), vec!["B"]);
    }
}
