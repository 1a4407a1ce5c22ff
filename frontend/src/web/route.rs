//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其属性。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppRoute {
    /// 登录页面（唯一不需要认证的路由）
    Login,
    Dashboard,
    Nodes,
    Subscriptions,
    Output,
    Monitoring,
    Settings,
    Profile,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 导航栏中显示的受保护页面
    pub const NAV: [AppRoute; 7] = [
        AppRoute::Dashboard,
        AppRoute::Nodes,
        AppRoute::Subscriptions,
        AppRoute::Output,
        AppRoute::Monitoring,
        AppRoute::Settings,
        AppRoute::Profile,
    ];

    /// 将 URL path 解析为路由枚举
    ///
    /// `/` 是重定向记录，直接解析为面板。
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" | "/dashboard" => Self::Dashboard,
            "/login" => Self::Login,
            "/nodes" => Self::Nodes,
            "/subscriptions" => Self::Subscriptions,
            "/output" => Self::Output,
            "/monitoring" => Self::Monitoring,
            "/settings" => Self::Settings,
            "/profile" => Self::Profile,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
            Self::Nodes => "/nodes",
            Self::Subscriptions => "/subscriptions",
            Self::Output => "/output",
            Self::Monitoring => "/monitoring",
            Self::Settings => "/settings",
            Self::Profile => "/profile",
            Self::NotFound => "/404",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "登录",
            Self::Dashboard => "仪表板",
            Self::Nodes => "节点管理",
            Self::Subscriptions => "订阅管理",
            Self::Output => "输出配置",
            Self::Monitoring => "监控检测",
            Self::Settings => "系统设置",
            Self::Profile => "个人资料",
            Self::NotFound => "页面不存在",
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    ///
    /// 默认需要，只有登录页例外（未找到页面同样需要认证）。
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login)
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_redirects_to_dashboard() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path(""), AppRoute::Dashboard);
    }

    #[test]
    fn paths_round_trip_for_every_known_route() {
        for route in AppRoute::NAV.iter().chain([AppRoute::Login].iter()) {
            assert_eq!(AppRoute::from_path(route.to_path()), *route);
        }
        assert_eq!(AppRoute::from_path("/nodes/"), AppRoute::Nodes);
        assert_eq!(AppRoute::from_path("/nodes?page=2"), AppRoute::Nodes);
    }

    #[test]
    fn unknown_paths_are_not_found_and_protected() {
        let route = AppRoute::from_path("/does/not/exist");
        assert_eq!(route, AppRoute::NotFound);
        assert!(route.requires_auth());
        assert_eq!(route.title(), "页面不存在");
    }

    #[test]
    fn only_login_is_public() {
        assert!(!AppRoute::Login.requires_auth());
        assert!(AppRoute::NAV.iter().all(AppRoute::requires_auth));
    }
}
