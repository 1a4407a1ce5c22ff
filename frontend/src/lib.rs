//! 订阅转换器前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `state`: 启动时构建的应用状态（通知、HTTP 客户端、两个仓库）
//! - `api` / `request`: HTTP 客户端封装与传输抽象
//! - `auth` / `nodes`: 会话仓库与节点仓库
//! - `guard` + `web::router`: 导航守卫与路由服务
//! - `components`: UI 组件层

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod nodes;
pub mod notify;
pub mod request;
pub mod state;

mod components {
    pub mod dashboard;
    pub mod layout;
    pub mod login;
    pub mod monitoring;
    pub mod nodes;
    pub mod profile;
    pub mod section;
}

use crate::components::dashboard::DashboardPage;
use crate::components::layout::Layout;
use crate::components::login::LoginPage;
use crate::components::monitoring::MonitoringPage;
use crate::components::nodes::NodesPage;
use crate::components::profile::ProfilePage;
use crate::components::section::SectionPage;
use crate::config::{AppConfig, BuildEnv};
use crate::state::AppState;

use leptos::prelude::*;
use leptos::task::spawn_local;

// 浏览器 API 封装模块
// 存储与 HTTP 传输都实现了可替换的 trait，仓库逻辑不直接依赖浏览器。
pub mod web {
    mod http;
    pub mod route;
    pub mod router;
    mod storage;

    pub use http::FetchHttpClient;
    pub use storage::{KeyValueStorage, LocalStorage};

    #[cfg(test)]
    pub use storage::MemoryStorage;
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Nodes => view! { <NodesPage /> }.into_any(),
        AppRoute::Monitoring => view! { <MonitoringPage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::Subscriptions => {
            view! { <SectionPage route=route description="管理订阅源与节点导入" /> }.into_any()
        }
        AppRoute::Output => {
            view! { <SectionPage route=route description="生成各客户端可用的订阅输出" /> }.into_any()
        }
        AppRoute::Settings => {
            view! { <SectionPage route=route description="系统参数与检测策略" /> }.into_any()
        }
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"页面不存在"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 读取配置并创建应用状态
    let config = AppConfig::new(&BuildEnv);
    log::info!(
        "{} v{} (api: {:?})",
        config.app_title,
        config.app_version,
        config.api_base_url
    );
    log::debug!(
        "[Config] dev server :{} proxies to {}",
        config.dev_server_port,
        config.backend_origin()
    );
    let state = AppState::browser(config);
    provide_context(state.clone());

    // 2. 恢复会话；守卫会等待这次初始化而不是再发起一次
    let session = state.session.clone();
    spawn_local(async move {
        session.init().await;
    });

    view! {
        // 3. 路由器组件：注入会话仓库实现守卫
        <Router session=state.session.clone() config=state.config.clone()>
            <Layout>
                <RouterOutlet matcher=route_matcher />
            </Layout>
        </Router>
    }
}
