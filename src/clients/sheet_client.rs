/// 表格 API 客户端
///
/// 通过可视化查询接口读取表格，返回的是 `setResponse({...});` 包装的伪 JSON。
/// 同一时间只允许一个请求，不做重试。
use crate::config::Config;
use crate::error::{AppError, AppResult, ConfigError, FetchError};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, info};

/// 表格数据源
///
/// 返回按列位置排列的单元格文本，空单元格为 ""。
pub trait SheetSource {
    fn query(
        &self,
        query: &str,
        fetch_size: Option<usize>,
    ) -> impl Future<Output = AppResult<Vec<Vec<String>>>> + Send;
}

/// 表格客户端
pub struct SheetClient {
    http: reqwest::Client,
    endpoint: String,
    gid: String,
    in_flight: Semaphore,
}

impl SheetClient {
    /// 创建新的表格客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let (key, gid) = parse_sheet_url(&config.sheet_url).ok_or_else(|| {
            AppError::Config(ConfigError::InvalidSheetUrl {
                url: config.sheet_url.clone(),
            })
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: format!("https://docs.google.com/spreadsheets/d/{}/gviz/tq", key),
            gid,
            in_flight: Semaphore::new(1),
        })
    }

    async fn fetch(&self, query: &str, fetch_size: Option<usize>) -> AppResult<Vec<Vec<String>>> {
        let _permit = self
            .in_flight
            .try_acquire()
            .map_err(|_| FetchError::RequestInFlight)?;

        let tq = crate::clients::query::with_limit(query, fetch_size);
        debug!("表格查询: {}", tq);

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("tqx", "out:json"), ("gid", self.gid.as_str()), ("tq", tq.as_str())])
            .send()
            .await
            .map_err(|e| AppError::fetch_failed(&self.endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::fetch_failed(&self.endpoint, e))?;

        let rows = parse_response(&body)?;
        info!("✓ 表格返回 {} 行", rows.len());
        Ok(rows)
    }
}

impl SheetSource for SheetClient {
    fn query(
        &self,
        query: &str,
        fetch_size: Option<usize>,
    ) -> impl Future<Output = AppResult<Vec<Vec<String>>>> + Send {
        self.fetch(query, fetch_size)
    }
}

/// 从表格链接中取出表格 ID 和工作表 gid
pub fn parse_sheet_url(url: &str) -> Option<(String, String)> {
    static KEY_RE: OnceLock<Regex> = OnceLock::new();
    static GID_RE: OnceLock<Regex> = OnceLock::new();

    let key_re = KEY_RE.get_or_init(|| {
        Regex::new(r"/spreadsheets/d/([A-Za-z0-9_-]+)").expect("静态正则表达式")
    });
    let gid_re = GID_RE.get_or_init(|| Regex::new(r"gid=([0-9]+)").expect("静态正则表达式"));

    let key = key_re.captures(url)?.get(1)?.as_str().to_string();
    let gid = gid_re
        .captures(url)
        .and_then(|c| c.get(1))
        .map_or_else(|| "0".to_string(), |m| m.as_str().to_string());

    Some((key, gid))
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    status: String,
    #[serde(default)]
    errors: Vec<QueryMessage>,
    table: Option<QueryTable>,
}

#[derive(Debug, Deserialize)]
struct QueryMessage {
    reason: Option<String>,
    message: Option<String>,
    detailed_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryTable {
    #[serde(default)]
    rows: Vec<QueryRow>,
}

#[derive(Debug, Deserialize)]
struct QueryRow {
    #[serde(default)]
    c: Vec<Option<QueryCell>>,
}

#[derive(Debug, Deserialize)]
struct QueryCell {
    v: Option<Value>,
    /// 格式化后的值，优先使用
    f: Option<String>,
}

impl QueryCell {
    fn into_text(self) -> String {
        if let Some(formatted) = self.f {
            return formatted;
        }
        match self.v {
            Some(Value::String(s)) => s,
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

/// 去掉 `setResponse(...)` 包装并解析成单元格文本
pub fn parse_response(body: &str) -> AppResult<Vec<Vec<String>>> {
    static WRAPPER_RE: OnceLock<Regex> = OnceLock::new();
    let wrapper_re = WRAPPER_RE.get_or_init(|| {
        Regex::new(r"(?s)setResponse\((.*)\)\s*;?\s*$").expect("静态正则表达式")
    });

    let json = wrapper_re
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| AppError::malformed_response("响应中没有 setResponse(...)"))?;

    let response: QueryResponse = serde_json::from_str(json)?;

    if response.status == "error" {
        let message = response
            .errors
            .into_iter()
            .map(|e| {
                e.detailed_message
                    .or(e.message)
                    .or(e.reason)
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join("; ");
        return Err(FetchError::QueryRejected { message }.into());
    }

    let table = response
        .table
        .ok_or_else(|| AppError::malformed_response("响应中没有 table"))?;

    Ok(table
        .rows
        .into_iter()
        .map(|row| {
            row.c
                .into_iter()
                .map(|cell| cell.map(QueryCell::into_text).unwrap_or_default())
                .collect()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sheet_url() {
        let (key, gid) = parse_sheet_url(
            "https://docs.google.com/spreadsheets/d/1UvH8jHZu3mLjZv-gJaMIZOXlwkOBm_pnZrCUsW9f1Mk/edit#gid=42?usp=sharing",
        )
        .unwrap();
        assert_eq!(key, "1UvH8jHZu3mLjZv-gJaMIZOXlwkOBm_pnZrCUsW9f1Mk");
        assert_eq!(gid, "42");

        let (_, gid) = parse_sheet_url("https://docs.google.com/spreadsheets/d/abc/edit").unwrap();
        assert_eq!(gid, "0");

        assert!(parse_sheet_url("https://example.com/sheet").is_none());
    }

    #[test]
    fn test_parse_response_rows() {
        let body = r#"/*O_o*/
google.visualization.Query.setResponse({"version":"0.6","reqId":"0","status":"ok","table":{"cols":[{"id":"A","label":"","type":"string"},{"id":"B","label":"","type":"number"}],"rows":[{"c":[{"v":"C1Q1"},{"v":3.0,"f":"3"}]},{"c":[{"v":"C1Q2"},null]}]}});"#;

        let rows = parse_response(body).unwrap();
        assert_eq!(rows, vec![vec!["C1Q1", "3"], vec!["C1Q2", ""]]);
    }

    #[test]
    fn test_parse_response_error_status() {
        let body = r#"google.visualization.Query.setResponse({"status":"error","errors":[{"reason":"invalid_query","message":"INVALID_QUERY","detailed_message":"Invalid query: NO_COLUMN: Z"}]});"#;

        let err = parse_response(body).unwrap_err();
        match err {
            AppError::Fetch(FetchError::QueryRejected { message }) => {
                assert_eq!(message, "Invalid query: NO_COLUMN: Z");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_parse_response_not_wrapped() {
        let err = parse_response("<html>login required</html>").unwrap_err();
        assert!(matches!(
            err,
            AppError::Fetch(FetchError::MalformedResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_second_request_is_rejected_while_pending() {
        let client = SheetClient::new(&Config::default()).unwrap();
        let _held = client.in_flight.try_acquire().unwrap();

        let err = client.query("select A", None).await.unwrap_err();
        assert!(matches!(err, AppError::Fetch(FetchError::RequestInFlight)));
    }

    #[tokio::test]
    #[ignore] // 需要网络：cargo test -- --ignored
    async fn test_fetch_public_sheet() {
        let _ = tracing_subscriber::fmt::try_init();
        let client = SheetClient::new(&Config::from_env()).unwrap();
        let rows = client.query("select A, B limit 3", None).await.unwrap();
        assert!(rows.len() <= 3);
    }
}
