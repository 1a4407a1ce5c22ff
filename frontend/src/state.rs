//! 应用状态
//!
//! 启动时构建一次，通过 Context 提供给所有组件。

use std::sync::Arc;

use leptos::prelude::*;

use crate::api::ApiClient;
use crate::auth::{SessionState, SessionStore};
use crate::config::AppConfig;
use crate::nodes::NodeStore;
use crate::notify::Notifier;
use crate::request::HttpClient;
use crate::web::{FetchHttpClient, KeyValueStorage, LocalStorage};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub notifier: Notifier,
    pub api: ApiClient,
    pub session: SessionStore,
    pub nodes: NodeStore,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        http: Arc<dyn HttpClient>,
        storage: Arc<dyn KeyValueStorage>,
    ) -> Self {
        let notifier = Notifier::new();
        let session_state = SessionState::restore(storage.as_ref());
        let api = ApiClient::new(&config.api_base_url, http, storage, session_state, notifier);

        Self {
            session: SessionStore::new(api.clone()),
            nodes: NodeStore::new(api.clone()),
            config,
            notifier,
            api,
        }
    }

    /// 浏览器环境：fetch + LocalStorage
    pub fn browser(config: AppConfig) -> Self {
        let http = Arc::new(FetchHttpClient::new(config.request_timeout_ms));
        Self::new(config, http, Arc::new(LocalStorage))
    }
}

/// 从 Context 获取应用状态
pub fn use_app_state() -> AppState {
    use_context::<AppState>().expect("AppState should be provided")
}
