//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 守卫 -> 处理 -> 加载"的导航流程，守卫见 `crate::guard`。

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;
use crate::auth::SessionStore;
use crate::config::AppConfig;
use crate::guard::{self, GuardOutcome};

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

fn set_document_title(title: &str) {
    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        document.set_title(title);
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
#[derive(Clone)]
pub struct RouterService {
    /// 当前路由，首次守卫完成前为 `None`
    current_route: RwSignal<Option<AppRoute>>,
    session: SessionStore,
    config: AppConfig,
}

impl RouterService {
    fn new(session: SessionStore, config: AppConfig) -> Self {
        Self {
            current_route: RwSignal::new(None),
            session,
            config,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> Signal<Option<AppRoute>> {
        self.current_route.into()
    }

    /// **核心方法：导航与守卫**
    ///
    /// 守卫是异步的（可能需要先恢复会话），因此在本地执行器中完成导航。
    pub fn navigate(&self, path: &str) {
        let target = AppRoute::from_path(path);
        let router = self.clone();
        spawn_local(async move {
            router.navigate_to_route(target, true).await;
        });
    }

    /// 导航到指定路由
    ///
    /// # Arguments
    /// * `target` - 目标路由
    /// * `use_push` - true 使用 pushState；重定向总是使用 replaceState
    async fn navigate_to_route(&self, target: AppRoute, use_push: bool) {
        let outcome = guard::before_each(&self.session, target).await;
        let route = outcome.route();

        match outcome {
            GuardOutcome::Proceed(_) if use_push => push_history_state(route.to_path()),
            _ => replace_history_state(route.to_path()),
        }
        self.load(route);
    }

    /// 更新 UI 与页面标题
    fn load(&self, route: AppRoute) {
        set_document_title(&self.config.page_title(route.title()));
        self.current_route.set(Some(route));
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = self.clone();

        let closure = Closure::<dyn Fn()>::new(move || {
            let router = router.clone();
            let target = AppRoute::from_path(&current_path());
            // popstate 时也执行守卫逻辑
            spawn_local(async move {
                router.navigate_to_route(target, false).await;
            });
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 设置认证状态变化时的自动重定向
    ///
    /// 只在状态翻转时处理，首次运行只记录初始值。
    fn setup_auth_redirect(&self) {
        let router = self.clone();
        let logged_in = self.session.state().logged_in_signal();

        Effect::new(move |prev: Option<bool>| {
            let is_auth = logged_in.get();
            let changed = prev.is_some_and(|prev| prev != is_auth);

            if let (true, Some(route)) = (changed, router.current_route.get_untracked()) {
                if is_auth && route.should_redirect_when_authenticated() {
                    // 用户刚登录，如果在登录页则重定向到面板
                    log::info!("[Router] logged in, redirecting to dashboard");
                    let redirect = AppRoute::auth_success_redirect();
                    push_history_state(redirect.to_path());
                    router.load(redirect);
                } else if !is_auth && route.requires_auth() {
                    // 登出或 401，如果在受保护页面则重定向到登录
                    log::info!("[Router] logged out, redirecting to login");
                    let redirect = AppRoute::auth_failure_redirect();
                    push_history_state(redirect.to_path());
                    router.load(redirect);
                }
            }

            is_auth
        });
    }

    /// 解析启动时的地址
    fn resolve_initial(&self) {
        let router = self.clone();
        let target = AppRoute::from_path(&current_path());
        spawn_local(async move {
            router.navigate_to_route(target, false).await;
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(session: SessionStore, config: AppConfig) -> RouterService {
    let router = RouterService::new(session, config);

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_auth_redirect();
    router.resolve_initial();

    provide_context(router.clone());
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话仓库，供守卫使用
    session: SessionStore,
    /// 应用配置，用于拼接页面标题
    config: AppConfig,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(session, config);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件，首次守卫完成前显示加载状态。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();
    let current = router.current_route();

    move || match current.get() {
        Some(route) => matcher(route),
        None => view! {
            <div class="flex items-center justify-center min-h-screen">
                <span class="loading loading-spinner loading-lg"></span>
            </div>
        }
        .into_any(),
    }
}

/// 站内链接，点击时走路由服务而不是整页跳转
#[component]
pub fn Link(
    /// 目标路由
    to: AppRoute,
    #[prop(optional, into)]
    class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate(to.to_path());
    };

    view! {
        <a href=to.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}
