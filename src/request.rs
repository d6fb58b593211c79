use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::error::{ApiError, ApiResult, TransportError};
pub use pressroom_shared::protocol::HttpMethod;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// multipart 上传的单个文件
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartFile {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// 已序列化的 JSON 文本
    Json(String),
    Multipart(MultipartFile),
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self.body = Some(RequestBody::Json(body.to_string()));
        self
    }

    /// Content-Type 由传输实现根据 boundary 生成
    pub fn with_multipart(mut self, file: MultipartFile) -> Self {
        self.body = Some(RequestBody::Multipart(file));
        self
    }

    /// 按名称查找请求头（大小写不敏感）
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 空响应体按 JSON `null` 解码，使 `()`/`IgnoredAny`/`Option` 类型的接口成功
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        let text = if self.body.trim().is_empty() {
            "null"
        } else {
            self.body.as_str()
        };
        serde_json::from_str(text).map_err(ApiError::from)
    }
}

/// HTTP 客户端特性 (Trait)
/// 浏览器中的 fetch future 不是 Send 的，因此使用 (?Send)
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError>;
}

// =========================================================
// 实现层: reqwest 客户端 (native)
// =========================================================

#[cfg(feature = "native")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

#[cfg(feature = "native")]
impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: std::time::Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;
        Ok(Self { client })
    }
}

#[cfg(feature = "native")]
#[async_trait::async_trait(?Send)]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &req.url);

        for (k, v) in &req.headers {
            builder = builder.header(k, v);
        }

        match req.body {
            Some(RequestBody::Json(body)) => builder = builder.body(body),
            Some(RequestBody::Multipart(file)) => {
                let part = reqwest::multipart::Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.content_type)
                    .map_err(|e| TransportError::Build(e.to_string()))?;
                builder = builder.multipart(reqwest::multipart::Form::new().part(file.field, part));
            }
            None => {}
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<RequestBody>,
}

#[cfg(test)]
impl RecordedRequest {
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn json_body(&self) -> Option<serde_json::Value> {
        match &self.body {
            Some(RequestBody::Json(s)) => serde_json::from_str(s).ok(),
            _ => None,
        }
    }
}

/// 按 "METHOD URL" 匹配的响应桩，克隆体共享同一份记录
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockHttpClient {
    responses: Rc<RefCell<HashMap<String, (u16, String)>>>,
    unreachable: Rc<RefCell<Vec<String>>>,
    pub requests: Rc<RefCell<Vec<RecordedRequest>>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(method: HttpMethod, url: &str) -> String {
        format!("{} {}", method.as_str(), url)
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.responses
            .borrow_mut()
            .insert(Self::key(method, url), (status, body.to_string()));
    }

    pub fn mock_raw(&self, method: HttpMethod, url: &str, status: u16, body: &str) {
        self.responses
            .borrow_mut()
            .insert(Self::key(method, url), (status, body.to_string()));
    }

    /// 模拟网络不可达
    pub fn mock_unreachable(&self, method: HttpMethod, url: &str) {
        self.unreachable.borrow_mut().push(Self::key(method, url));
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.borrow().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(RecordedRequest {
            method: req.method,
            url: req.url.clone(),
            headers: req.headers.clone(),
            body: req.body.clone(),
        });

        let key = Self::key(req.method, &req.url);
        if self.unreachable.borrow().contains(&key) {
            return Err(TransportError::Network(format!("{} unreachable", req.url)));
        }

        let responses = self.responses.borrow();
        if let Some((status, body)) = responses.get(&key) {
            Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            })
        } else {
            Ok(HttpResponse {
                status: 404,
                body: r#"{"message":"Not Found"}"#.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::IgnoredAny;

    #[test]
    fn test_empty_body_decodes_as_null() {
        let resp = HttpResponse {
            status: 204,
            body: String::new(),
        };
        assert!(resp.json::<IgnoredAny>().is_ok());
        assert_eq!(resp.json::<Option<u32>>().unwrap(), None);
    }

    #[test]
    fn test_invalid_body_is_decode_error() {
        let resp = HttpResponse {
            status: 200,
            body: "not json".into(),
        };
        let err = resp.json::<Vec<u32>>().unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Decode);
    }

    #[test]
    fn test_json_sets_content_type() {
        let req = HttpRequest::new("http://x/posts", HttpMethod::Post)
            .with_json(serde_json::json!({ "a": 1 }));
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.body, Some(RequestBody::Json(r#"{"a":1}"#.to_string())));
    }
}

#[cfg(all(test, feature = "native"))]
mod reqwest_tests {
    use super::*;
    use crate::context::SessionContext;
    use crate::error::ErrorKind;
    use crate::gateway::ApiGateway;
    use crate::storage::{KeyValueStore, MemoryStore};
    use pressroom_shared::protocol::ListPostsRequest;
    use pressroom_shared::{STORAGE_ACCESS_TOKEN, STORAGE_USER};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// 只应答一次的本地 HTTP 服务，任务结果是收到的原始请求
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            while !request_complete(&raw) {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&raw).into_owned()
        });
        (format!("http://{}", addr), handle)
    }

    /// 头部结束且 body 达到 Content-Length
    fn request_complete(raw: &[u8]) -> bool {
        let Some(end) = raw.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&raw[..end]);
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        raw.len() >= end + 4 + content_length
    }

    #[tokio::test]
    async fn test_reqwest_round_trip() {
        let (base, server) = serve_once("201 Created", r#"{"id":7}"#).await;
        let client = ReqwestHttpClient::with_timeout(Duration::from_secs(5)).unwrap();

        let req = HttpRequest::new(&format!("{}/posts", base), HttpMethod::Post)
            .with_header("Authorization", "Bearer t1")
            .with_json(serde_json::json!({ "title": "Hello" }));
        let resp = client.send(req).await.unwrap();

        assert_eq!(resp.status, 201);
        assert!(resp.is_success());
        assert_eq!(resp.json::<serde_json::Value>().unwrap()["id"], 7);

        let raw = server.await.unwrap();
        let lower = raw.to_ascii_lowercase();
        assert!(raw.starts_with("POST /posts HTTP/1.1"));
        assert!(lower.contains("authorization: bearer t1"));
        assert!(lower.contains("content-type: application/json"));
        assert!(raw.ends_with(r#"{"title":"Hello"}"#));
    }

    #[tokio::test]
    async fn test_gateway_over_reqwest_ends_session_on_401() {
        let (base, server) = serve_once("401 Unauthorized", r#"{"statusCode":401,"message":"Unauthorized"}"#).await;
        let user = crate::testing::user_json(1, "USER").to_string();
        let store = MemoryStore::with_entries([(STORAGE_ACCESS_TOKEN, "tok-1"), (STORAGE_USER, user.as_str())]);
        let session = SessionContext::new(store.clone());
        let gateway = ApiGateway::new(ReqwestHttpClient::new(), &base, session.clone());

        let err = gateway.call(&ListPostsRequest::default()).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(err.status, Some(401));
        assert!(!session.is_authenticated());
        assert_eq!(store.get(STORAGE_ACCESS_TOKEN).unwrap(), None);

        let raw = server.await.unwrap();
        assert!(raw.starts_with("GET /posts"));
        assert!(raw.to_ascii_lowercase().contains("authorization: bearer tok-1"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ReqwestHttpClient::with_timeout(Duration::from_secs(2)).unwrap();
        let err = client
            .send(HttpRequest::new(&format!("http://{}/posts", addr), HttpMethod::Get))
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Network(_)));
    }
}
