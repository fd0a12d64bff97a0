//! HTTP client for the detection service's check, health, and trusted-source endpoints.

use std::time::Duration;

use async_trait::async_trait;
use newscheck_core::{CheckRequest, CheckResponse, HealthStatus, TrustedSources};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::api::CheckApi;

/// Used when neither the server nor the transport error says anything useful.
pub const GENERIC_ERROR_MESSAGE: &str =
    "Could not reach the fact-check service. Please try again later.";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server {
        status: u16,
        /// Human-readable text pulled from `detail` or `message`, if any.
        message: Option<String>,
        body: String,
    },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Text to show the user: server detail, then the error's own description,
    /// then [`GENERIC_ERROR_MESSAGE`].
    pub fn user_message(&self) -> String {
        match self {
            Self::Server {
                message: Some(m), ..
            } => m.clone(),
            Self::Server { status, .. } => format!("Request failed with status code {status}"),
            Self::Http(e) => {
                let text = e.to_string();
                if text.trim().is_empty() {
                    GENERIC_ERROR_MESSAGE.to_string()
                } else {
                    text
                }
            }
            Self::Json(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Pull a user-facing message out of an error body.
///
/// `detail` wins over `message`. A `detail` list (the 422 validation shape,
/// `[{"msg": ...}, ...]`) is joined with `"; "`.
pub fn error_message_from_body(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .detail
        .as_ref()
        .and_then(describe_detail)
        .or_else(|| parsed.message.filter(|m| !m.trim().is_empty()))
}

fn describe_detail(detail: &Value) -> Option<String> {
    match detail {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let msgs: Vec<String> = items.iter().filter_map(describe_detail).collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        Value::Object(fields) => fields
            .get("msg")
            .or_else(|| fields.get("message"))
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string),
        _ => None,
    }
}

/// HTTP client for one detection service instance.
pub struct CheckClient {
    client: reqwest::Client,
    base_url: String,
}

impl CheckClient {
    /// Create a client for the given base URL with the default timeout.
    ///
    /// `base_url` should be like `http://localhost:8000`; a trailing slash is dropped.
    pub fn new(base_url: String) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: String, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("newscheck/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit content for checking.
    ///
    /// A 2xx answer is decoded as-is, including `success: false` bodies; the
    /// caller decides what an application-level rejection means.
    pub async fn check(&self, request: &CheckRequest) -> Result<CheckResponse, ClientError> {
        let url = format!("{}/api/check", self.base_url);

        info!(
            url = %url,
            input_type = %request.input_type,
            num_sources = request.num_sources,
            "submitting content for checking"
        );
        let resp = self.client.post(&url).json(request).send().await?;
        let body = read_success_body(resp).await?;

        let result: CheckResponse = serde_json::from_str(&body)?;
        info!(
            success = result.success,
            references = result.references.len(),
            keywords = result.keywords.len(),
            "check complete"
        );
        Ok(result)
    }

    /// Query `GET /health`.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.get_json("/health").await
    }

    /// List the domains the service treats as trusted.
    pub async fn trusted_sources(&self) -> Result<TrustedSources, ClientError> {
        let sources: TrustedSources = self.get_json("/api/trusted-sources").await?;
        info!(count = sources.sources.len(), "fetched trusted sources");
        Ok(sources)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        info!(url = %url, "querying detection service");
        let resp = self.client.get(&url).send().await?;
        let body = read_success_body(resp).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl CheckApi for CheckClient {
    async fn check(&self, request: &CheckRequest) -> Result<CheckResponse, ClientError> {
        CheckClient::check(self, request).await
    }
}

async fn read_success_body(resp: reqwest::Response) -> Result<String, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let message = error_message_from_body(&body);
        warn!(status = status.as_u16(), message = ?message, "service returned an error status");
        return Err(ClientError::Server {
            status: status.as_u16(),
            message,
            body,
        });
    }
    Ok(resp.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use newscheck_core::{InputType, VerdictCode};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Serve one canned HTTP response; the handle yields the raw request text.
    async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<String>) {
        serve_raw(format!(
            "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        ))
        .await
    }

    /// Write `response` verbatim to the first connection, then close it.
    async fn serve_raw(response: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });
        (format!("http://{addr}"), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..pos]).to_string();
                let len = head
                    .lines()
                    .filter_map(|l| l.split_once(':'))
                    .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= pos + 4 + len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    fn request_body(raw: &str) -> Value {
        let (_, body) = raw.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    fn url_request() -> CheckRequest {
        CheckRequest {
            content: "https://vnexpress.net/bai-viet-123.html".into(),
            input_type: InputType::Url,
            num_sources: 5,
        }
    }

    const SUCCESS_BODY: &str = r#"{
        "success": true,
        "verdict": {"code": "LIKELY_TRUE", "label": "Có khả năng đúng",
                    "explanation": "...", "similarity_percentage": 82,
                    "confidence_percentage": 75},
        "keywords": ["covid", "vaccine"],
        "references": [{"url": "https://vnexpress.net/a.html", "domain": "vnexpress.net",
                        "similarity_percentage": 90}]
    }"#;

    #[tokio::test]
    async fn check_posts_request_and_decodes_result() {
        let (base, server) = serve_once(200, SUCCESS_BODY).await;
        let client = CheckClient::new(base).unwrap();

        let resp = client.check(&url_request()).await.unwrap();
        assert!(resp.success);
        assert_eq!(resp.verdict.unwrap().code, VerdictCode::LikelyTrue);
        assert_eq!(resp.keywords.len(), 2);
        assert_eq!(resp.references.len(), 1);

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /api/check HTTP/1.1"));
        assert_eq!(
            request_body(&raw),
            serde_json::json!({
                "content": "https://vnexpress.net/bai-viet-123.html",
                "input_type": "url",
                "num_sources": 5
            })
        );
    }

    #[tokio::test]
    async fn application_failure_is_returned_not_raised() {
        let (base, _server) =
            serve_once(200, r#"{"success": false, "message": "Khong tim thay"}"#).await;
        let client = CheckClient::new(base).unwrap();
        let resp = client.check(&url_request()).await.unwrap();
        assert!(!resp.success);
        assert_eq!(resp.message.as_deref(), Some("Khong tim thay"));
    }

    #[tokio::test]
    async fn non_success_status_uses_detail() {
        let (base, _server) =
            serve_once(500, r#"{"detail": "Lỗi xử lý: timeout"}"#).await;
        let client = CheckClient::new(base).unwrap();
        let err = client.check(&url_request()).await.unwrap_err();
        match &err {
            ClientError::Server { status, .. } => assert_eq!(*status, 500),
            other => panic!("expected Server error, got {other:?}"),
        }
        assert_eq!(err.user_message(), "Lỗi xử lý: timeout");
    }

    #[tokio::test]
    async fn non_success_without_detail_reports_status() {
        let (base, _server) = serve_once(503, "upstream unavailable").await;
        let client = CheckClient::new(base).unwrap();
        let err = client.check(&url_request()).await.unwrap_err();
        assert_eq!(err.user_message(), "Request failed with status code 503");
    }

    #[tokio::test]
    async fn undecodable_success_body_is_generic_error() {
        let (base, _server) = serve_once(200, "<html>proxy page</html>").await;
        let client = CheckClient::new(base).unwrap();
        let err = client.check(&url_request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Json(_)));
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn truncated_success_body_is_transport_error() {
        let (base, _server) = serve_raw(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
             Content-Length: 500\r\nConnection: close\r\n\r\n{\"success\": t"
                .to_string(),
        )
        .await;
        let client = CheckClient::new(base).unwrap();
        let err = client.check(&url_request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Http(_)), "got {err:?}");
        assert_ne!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn connection_refused_is_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = CheckClient::new(format!("http://{addr}")).unwrap();
        let err = client.check(&url_request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
        assert!(!err.user_message().is_empty());
    }

    #[tokio::test]
    async fn health_and_trusted_sources() {
        let (base, server) = serve_once(
            200,
            r#"{"status": "healthy", "fact_checker_initialized": true, "endpoints": {}}"#,
        )
        .await;
        let client = CheckClient::new(base).unwrap();
        assert!(client.health().await.unwrap().is_ready());
        assert!(server.await.unwrap().starts_with("GET /health HTTP/1.1"));

        let (base, server) = serve_once(
            200,
            r#"{"sources": {"vnexpress.net": {}, "tuoitre.vn": {}}, "count": 2}"#,
        )
        .await;
        let client = CheckClient::new(base).unwrap();
        let sources = client.trusted_sources().await.unwrap();
        assert_eq!(sources.domains().collect::<Vec<_>>(), ["tuoitre.vn", "vnexpress.net"]);
        assert!(server.await.unwrap().starts_with("GET /api/trusted-sources HTTP/1.1"));
    }

    #[test]
    fn detail_string_preferred_over_message() {
        let body = r#"{"success": false, "message": "Lỗi server nội bộ", "detail": "db down"}"#;
        assert_eq!(error_message_from_body(body).as_deref(), Some("db down"));
    }

    #[test]
    fn message_used_when_detail_missing() {
        let body = r#"{"success": false, "message": "Endpoint không tồn tại"}"#;
        assert_eq!(
            error_message_from_body(body).as_deref(),
            Some("Endpoint không tồn tại")
        );
    }

    #[test]
    fn validation_detail_list_is_joined() {
        let body = r#"{"detail": [
            {"loc": ["body", "content"], "msg": "Content quá ngắn", "type": "value_error"},
            {"loc": ["body", "num_sources"], "msg": "num_sources phải từ 1 đến 10", "type": "value_error"}
        ]}"#;
        assert_eq!(
            error_message_from_body(body).as_deref(),
            Some("Content quá ngắn; num_sources phải từ 1 đến 10")
        );
    }

    #[test]
    fn unparseable_body_yields_none() {
        assert_eq!(error_message_from_body("Bad Gateway"), None);
        assert_eq!(error_message_from_body(r#"{"detail": ""}"#), None);
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = CheckClient::new("http://localhost:8000/".into()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
