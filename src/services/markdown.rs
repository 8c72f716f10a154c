//! Markdown 渲染
//!
//! 题干使用 Markdown 书写，渲染后去掉最外层的一个段落标签，方便嵌入标题。

use pulldown_cmark::{html, Options, Parser};

/// Markdown → HTML 片段
pub fn markdown_to_html(input: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(input, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    strip_paragraph(&out).to_string()
}

/// 去掉开头的一个 `<p>` 和结尾的一个 `</p>`
pub fn strip_paragraph(html: &str) -> &str {
    let trimmed = html.trim_end_matches('\n');
    let trimmed = trimmed.strip_prefix("<p>").unwrap_or(trimmed);
    trimmed.strip_suffix("</p>").unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_paragraph_is_unwrapped() {
        assert_eq!(markdown_to_html("Which is **true**?"), "Which is <strong>true</strong>?");
    }

    #[test]
    fn test_code_block_is_kept() {
        let html = markdown_to_html("```\nint x = 1;\n```");
        assert!(html.starts_with("<pre><code>"));
        assert!(html.contains("int x = 1;"));
    }

    #[test]
    fn test_strip_paragraph_only_once() {
        assert_eq!(strip_paragraph("<p>a</p>\n<p>b</p>\n"), "a</p>\n<p>b");
        assert_eq!(strip_paragraph("plain"), "plain");
    }
}
