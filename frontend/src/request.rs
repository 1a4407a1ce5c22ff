use serde::de::DeserializeOwned;
use std::collections::HashMap;
use subconv_shared::protocol::HttpMethod;

#[cfg(test)]
use std::collections::VecDeque;
#[cfg(test)]
use std::sync::Mutex;
#[cfg(test)]
use std::sync::atomic::{AtomicBool, Ordering};

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    /// 未编码的查询参数，由具体传输实现负责编码
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
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

    /// 空响应体按 `null` 解析
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        if self.body.trim().is_empty() {
            serde_json::from_str("null")
        } else {
            serde_json::from_str(&self.body)
        }
    }
}

/// 传输层错误（未收到 HTTP 响应）
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("请求超时")]
    Timeout,
    #[error("网络错误: {0}")]
    Network(String),
    #[error("请求构建失败: {0}")]
    Request(String),
}

/// HTTP 客户端特性 (Trait)
///
/// 浏览器中的 future 不是 Send 的，因此使用 `?Send`；
/// 实现本身要求 `Send + Sync` 以便放入 Leptos Context。
#[async_trait::async_trait(?Send)]
pub trait HttpClient: Send + Sync {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError>;
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
#[derive(Debug, Clone)]
enum MockReply {
    Response(u16, String),
    Failure(TransportError),
}

/// 按 "METHOD URL" 匹配的模拟客户端
///
/// 同一个键可以排队多个响应，最后一个会被重复使用。
#[cfg(test)]
pub struct MockHttpClient {
    responses: Mutex<HashMap<String, VecDeque<MockReply>>>,
    requests: Mutex<Vec<HttpRequest>>,
    /// 回复前让出一次执行权，模拟真实网络的挂起点
    yielding: AtomicBool,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            yielding: AtomicBool::new(false),
        }
    }

    pub fn yield_before_reply(&self) {
        self.yielding.store(true, Ordering::SeqCst);
    }

    fn key(method: HttpMethod, url: &str) -> String {
        format!("{} {}", method.as_str(), url)
    }

    fn push(&self, method: HttpMethod, url: &str, reply: MockReply) {
        self.responses
            .lock()
            .unwrap()
            .entry(Self::key(method, url))
            .or_default()
            .push_back(reply);
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.push(method, url, MockReply::Response(status, body.to_string()));
    }

    pub fn mock_raw(&self, method: HttpMethod, url: &str, status: u16, body: &str) {
        self.push(method, url, MockReply::Response(status, body.to_string()));
    }

    pub fn mock_failure(&self, method: HttpMethod, url: &str, error: TransportError) {
        self.push(method, url, MockReply::Failure(error));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let key = Self::key(req.method, &req.url);
        self.requests.lock().unwrap().push(req);

        if self.yielding.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }

        let reply = {
            let mut responses = self.responses.lock().unwrap();
            match responses.get_mut(&key) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(MockReply::Response(status, body)) => Ok(HttpResponse { status, body }),
            Some(MockReply::Failure(error)) => Err(error),
            None => Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            }),
        }
    }
}
