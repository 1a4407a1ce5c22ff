//! 浏览器 HTTP 传输
//!
//! 基于 `gloo-net` 的 fetch 封装，实现 `HttpClient`。
//! 查询参数编码交给 `RequestBuilder::query`，超时由 `gloo-timers` 与请求竞速实现。

use crate::request::{HttpClient, HttpRequest, HttpResponse, TransportError};
use futures::future::{Either, select};
use gloo_net::http::{Method, RequestBuilder};
use gloo_timers::future::TimeoutFuture;
use subconv_shared::protocol::HttpMethod;

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// fetch 客户端
pub struct FetchHttpClient {
    timeout_ms: u32,
}

impl FetchHttpClient {
    pub fn new(timeout_ms: u32) -> Self {
        Self { timeout_ms }
    }

    async fn dispatch(req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = RequestBuilder::new(&req.url).method(to_method(req.method));

        if !req.query.is_empty() {
            builder = builder.query(req.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        let request = match req.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| TransportError::Request(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        // 读取响应体失败时按空响应处理，由状态码决定后续逻辑
        let body = response.text().await.unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let request = Box::pin(Self::dispatch(req));
        let timeout = Box::pin(TimeoutFuture::new(self.timeout_ms));

        match select(request, timeout).await {
            Either::Left((result, _)) => result,
            Either::Right(_) => Err(TransportError::Timeout),
        }
    }
}
