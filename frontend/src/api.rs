//! HTTP 客户端封装
//!
//! 所有后端调用都经过 `ApiClient::call`：
//! 附加 Bearer 令牌、编码请求体、按状态码给出一次提示、记录耗时。

use std::sync::Arc;

use chrono::Utc;
use leptos::prelude::*;
use subconv_shared::protocol::ApiRequest;
use subconv_shared::{BEARER_PREFIX, HEADER_AUTHORIZATION};

use crate::auth::{SessionState, TOKEN_STORAGE_KEY};
use crate::error::{ApiError, ApiResult, MSG_AUTH_FAILED, MSG_LOGIN_EXPIRED};
use crate::notify::Notifier;
use crate::request::{HttpClient, HttpRequest};
use crate::web::KeyValueStorage;

#[derive(Clone)]
pub struct ApiClient {
    http: Arc<dyn HttpClient>,
    storage: Arc<dyn KeyValueStorage>,
    base_url: String,
    session: SessionState,
    notifier: Notifier,
    /// `init` 安装的默认令牌，会话里没有令牌时使用
    default_auth: RwSignal<Option<String>>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        http: Arc<dyn HttpClient>,
        storage: Arc<dyn KeyValueStorage>,
        session: SessionState,
        notifier: Notifier,
    ) -> Self {
        Self {
            http,
            storage,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            notifier,
            default_auth: RwSignal::new(None),
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn notifier(&self) -> Notifier {
        self.notifier
    }

    pub fn storage(&self) -> &dyn KeyValueStorage {
        self.storage.as_ref()
    }

    pub fn set_default_token(&self, token: &str) {
        self.default_auth.set(Some(token.to_string()));
    }

    pub fn default_token(&self) -> Option<String> {
        self.default_auth.get_untracked()
    }

    /// 当前调用使用的令牌，每次调用时重新读取
    fn bearer(&self) -> Option<String> {
        self.session
            .token()
            .or_else(|| self.default_auth.get_untracked())
            .filter(|t| !t.is_empty())
    }

    /// 结束会话：清空内存状态、持久化令牌与默认认证头
    pub fn end_session(&self) {
        self.session.clear();
        self.storage.delete(TOKEN_STORAGE_KEY);
        self.default_auth.set(None);
    }

    /// 发起请求，失败时弹出提示
    pub async fn call<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        self.execute(req, false).await
    }

    /// 静默请求：除 401 外的失败只记录日志
    pub async fn call_silent<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        self.execute(req, true).await
    }

    /// 客户端未提示过的错误（如响应解析失败）由调用方补充上下文提示
    pub fn report_unreported(&self, err: &ApiError, fallback: &str) {
        if !err.is_reported() {
            self.notifier.error(fallback);
        }
    }

    async fn execute<R: ApiRequest>(&self, req: &R, silent: bool) -> ApiResult<R::Response> {
        let url = self.url(&req.path());
        let mut request = HttpRequest::new(&url, R::METHOD);

        for (key, value) in req.query() {
            request = request.with_query(key, &value);
        }
        if let Some(token) = self.bearer() {
            request = request.with_header(HEADER_AUTHORIZATION, &format!("{}{}", BEARER_PREFIX, token));
        }
        if let Some(body) = req.body() {
            let json = serde_json::to_string(body).map_err(|e| {
                log::error!("[Api] {} {} encode failed: {}", R::METHOD.as_str(), url, e);
                ApiError::Encode(e.to_string())
            })?;
            request = request
                .with_header("Content-Type", "application/json")
                .with_body(json);
        }

        let started = Utc::now();
        let response = match self.http.send(request).await {
            Ok(response) => response,
            Err(e) => {
                let err = ApiError::from(e);
                self.report(&err, silent);
                return Err(err);
            }
        };

        if !response.is_success() {
            let err = ApiError::from_response(&response);
            if let ApiError::Unauthorized { detail } = &err {
                self.handle_unauthorized(detail.as_deref(), R::EXCHANGES_CREDENTIALS);
            } else {
                self.report(&err, silent);
            }
            return Err(err);
        }

        let elapsed = Utc::now().signed_duration_since(started).num_milliseconds();
        log::debug!(
            "[Api] {} {} -> {} ({} ms)",
            R::METHOD.as_str(),
            url,
            response.status,
            elapsed
        );

        response.json::<R::Response>().map_err(|e| {
            log::error!("[Api] {} {} decode failed: {}", R::METHOD.as_str(), url, e);
            ApiError::Decode(e.to_string())
        })
    }

    /// 401：无论哪个接口都结束会话
    ///
    /// 登录接口的 401 是凭据错误，显示后端原因；
    /// 其他接口持有令牌时提示重新登录。
    fn handle_unauthorized(&self, detail: Option<&str>, exchanges_credentials: bool) {
        let had_token = self.session.token().is_some();
        self.end_session();

        if had_token && !exchanges_credentials {
            self.notifier.error(MSG_LOGIN_EXPIRED);
        } else {
            self.notifier.error(detail.unwrap_or(MSG_AUTH_FAILED));
        }
    }

    fn report(&self, err: &ApiError, silent: bool) {
        if !err.is_reported() {
            return;
        }
        if silent {
            log::warn!("[Api] silent request failed: {}", err);
        } else {
            self.notifier.error(err.user_message());
        }
    }
}
