//! 导航守卫
//!
//! 进入任何路由前先确保会话已初始化，再根据认证状态决定放行或重定向。

use crate::auth::SessionStore;
use crate::web::route::AppRoute;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Proceed(AppRoute),
    Redirect(AppRoute),
}

impl GuardOutcome {
    /// 最终要显示的路由
    pub fn route(&self) -> AppRoute {
        match self {
            GuardOutcome::Proceed(route) | GuardOutcome::Redirect(route) => *route,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, GuardOutcome::Redirect(_))
    }
}

/// 纯判定逻辑，不访问会话
pub fn decide(target: AppRoute, logged_in: bool) -> GuardOutcome {
    if target.requires_auth() && !logged_in {
        return GuardOutcome::Redirect(AppRoute::auth_failure_redirect());
    }
    if target.should_redirect_when_authenticated() && logged_in {
        return GuardOutcome::Redirect(AppRoute::auth_success_redirect());
    }
    GuardOutcome::Proceed(target)
}

/// 有令牌但尚未加载资料时先等待 `init` 完成，失败不重试
pub async fn before_each(session: &SessionStore, target: AppRoute) -> GuardOutcome {
    if session.state().needs_init() {
        session.init().await;
    }

    let outcome = decide(target, session.state().is_logged_in_untracked());
    if let GuardOutcome::Redirect(to) = outcome {
        log::info!("[Guard] {} -> {}", target, to);
    }
    outcome
}
