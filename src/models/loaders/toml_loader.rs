use crate::error::{AppError, AppResult, ConfigError};
use crate::models::setup::ExamSetup;
use std::path::Path;
use tokio::fs;

/// 解析设置文件内容
pub fn parse_setup(content: &str, path: &str) -> AppResult<ExamSetup> {
    toml::from_str(content).map_err(|e| {
        AppError::Config(ConfigError::SetupParseFailed {
            path: path.to_string(),
            source: Box::new(e),
        })
    })
}

/// 从 TOML 文件加载考试设置
///
/// 文件不存在时返回 `Ok(None)`，此时沿用默认配置。
pub async fn load_setup_file(setup_path: &Path) -> AppResult<Option<ExamSetup>> {
    let path_str = setup_path.display().to_string();

    if !setup_path.exists() {
        tracing::info!("未找到设置文件 {}，使用默认配置", path_str);
        return Ok(None);
    }

    let content = fs::read_to_string(setup_path)
        .await
        .map_err(|e| AppError::io_failed(&path_str, e))?;

    let setup = parse_setup(&content, &path_str)?;
    tracing::info!("已加载设置文件: {}", path_str);

    Ok(Some(setup))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_setup_partial() {
        let setup = parse_setup(
            r#"
shuffle = false
question_count = 20
chapter = "Chapter 7"
"#,
            "exam_setup.toml",
        )
        .unwrap();

        assert_eq!(setup.shuffle, Some(false));
        assert_eq!(setup.question_count, Some(20));
        assert_eq!(setup.chapter.as_deref(), Some("Chapter 7"));
        assert_eq!(setup.shuffle_answers, None);
    }

    #[test]
    fn test_parse_setup_bad_type() {
        let err = parse_setup("question_count = \"many\"", "exam_setup.toml").unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::SetupParseFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let result = load_setup_file(Path::new("definitely/not/here.toml"))
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
