//! 认证模块
//!
//! `SessionState` 保存令牌与用户资料，`SessionStore` 负责登录、注册与资料维护。
//! 路由服务只通过 `logged_in_signal` 观察认证状态，与本模块解耦。

use std::sync::{Arc, Mutex, PoisonError};

use futures::channel::oneshot;
use leptos::prelude::*;
use subconv_shared::protocol::CurrentUserRequest;
use subconv_shared::{LoginCredentials, ProfileUpdate, RegisterData, UserProfile};

use crate::api::ApiClient;
use crate::web::KeyValueStorage;

/// 持久化令牌使用的键
pub const TOKEN_STORAGE_KEY: &str = "token";

const MSG_LOGIN_OK: &str = "登录成功";
const MSG_LOGIN_FAILED: &str = "登录失败";
const MSG_PROFILE_FAILED: &str = "获取用户信息失败";
const MSG_REGISTER_OK: &str = "注册成功，请登录";
const MSG_LOGOUT_OK: &str = "已退出登录";
const MSG_PROFILE_UPDATED: &str = "资料更新成功";

/// 会话状态
///
/// 所有字段都是信号句柄，`Copy` 后共享同一份状态。
#[derive(Clone, Copy)]
pub struct SessionState {
    pub token: RwSignal<Option<String>>,
    pub profile: RwSignal<Option<UserProfile>>,
    pub loading: RwSignal<bool>,
}

impl SessionState {
    /// 从持久化存储恢复令牌，资料需要重新获取
    pub fn restore(storage: &dyn KeyValueStorage) -> Self {
        let token = storage.get(TOKEN_STORAGE_KEY).filter(|t| !t.is_empty());
        Self {
            token: RwSignal::new(token),
            profile: RwSignal::new(None),
            loading: RwSignal::new(false),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.get_untracked()
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.profile.get_untracked()
    }

    /// 已登录 = 持有令牌且已加载资料（响应式）
    pub fn is_logged_in(&self) -> bool {
        self.token.with(Option::is_some) && self.profile.with(Option::is_some)
    }

    pub fn is_logged_in_untracked(&self) -> bool {
        self.token.with_untracked(Option::is_some) && self.profile.with_untracked(Option::is_some)
    }

    /// 有令牌但没有资料，需要先执行 `init`
    pub fn needs_init(&self) -> bool {
        self.token.with_untracked(Option::is_some) && self.profile.with_untracked(Option::is_none)
    }

    /// 认证状态信号（用于路由服务注入）
    pub fn logged_in_signal(&self) -> Signal<bool> {
        let state = *self;
        Signal::derive(move || state.is_logged_in())
    }

    pub fn clear(&self) {
        self.token.set(None);
        self.profile.set(None);
    }
}

/// 正在执行的 `init` 与等待它结束的调用方
#[derive(Default)]
struct InitFlight {
    running: bool,
    waiters: Vec<oneshot::Sender<()>>,
}

/// `init` 结束（包括 future 被丢弃）时复位并唤醒等待者
struct InitFlightGuard<'a>(&'a Mutex<InitFlight>);

impl Drop for InitFlightGuard<'_> {
    fn drop(&mut self) {
        let mut flight = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        flight.running = false;
        for waiter in flight.waiters.drain(..) {
            let _ = waiter.send(());
        }
    }
}

/// 会话仓库
#[derive(Clone)]
pub struct SessionStore {
    api: ApiClient,
    init_flight: Arc<Mutex<InitFlight>>,
}

impl SessionStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            init_flight: Arc::new(Mutex::new(InitFlight::default())),
        }
    }

    pub fn state(&self) -> SessionState {
        self.api.session()
    }

    /// 登录：换取令牌并持久化，然后获取资料
    ///
    /// 只有令牌签发且资料获取成功才返回 `true`。
    pub async fn login(&self, credentials: LoginCredentials) -> bool {
        let state = self.state();
        state.loading.set(true);
        let ok = self.login_inner(&credentials).await;
        state.loading.set(false);
        ok
    }

    async fn login_inner(&self, credentials: &LoginCredentials) -> bool {
        let token = match self.api.call(credentials).await {
            Ok(issued) => issued.access_token.filter(|t| !t.is_empty()),
            Err(e) => {
                self.api.report_unreported(&e, MSG_LOGIN_FAILED);
                return false;
            }
        };

        let Some(token) = token else {
            self.api.notifier().error(MSG_LOGIN_FAILED);
            return false;
        };

        self.state().token.set(Some(token.clone()));
        self.api.storage().set(TOKEN_STORAGE_KEY, &token);

        if self.fetch_profile().await.is_some() {
            log::info!("[Auth] logged in as {}", credentials.username);
            self.api.notifier().success(MSG_LOGIN_OK);
            true
        } else {
            // 401 已经结束会话并提示过，这里只处理其他失败
            if self.state().token().is_some() {
                self.api.notifier().error(MSG_PROFILE_FAILED);
            }
            false
        }
    }

    pub async fn register(&self, data: RegisterData) -> bool {
        let state = self.state();
        state.loading.set(true);
        let result = self.api.call(&data).await;
        state.loading.set(false);

        match result {
            Ok(_) => {
                self.api.notifier().success(MSG_REGISTER_OK);
                true
            }
            Err(e) => {
                self.api.report_unreported(&e, "注册失败");
                false
            }
        }
    }

    /// 获取当前用户资料，失败只记录日志
    pub async fn fetch_profile(&self) -> Option<UserProfile> {
        match self.api.call_silent(&CurrentUserRequest).await {
            Ok(profile) => {
                self.state().profile.set(Some(profile.clone()));
                Some(profile)
            }
            Err(e) => {
                log::warn!("[Auth] failed to fetch profile: {}", e);
                None
            }
        }
    }

    /// 注销：清空内存与持久化令牌，不会失败
    ///
    /// 导航由路由服务监听认证状态变化自动处理。
    pub fn logout(&self) {
        self.api.end_session();
        self.api.notifier().success(MSG_LOGOUT_OK);
    }

    pub async fn update_profile(&self, data: ProfileUpdate) -> bool {
        let state = self.state();
        state.loading.set(true);
        let result = self.api.call(&data).await;
        state.loading.set(false);

        match result {
            Ok(profile) => {
                state.profile.set(Some(profile));
                self.api.notifier().success(MSG_PROFILE_UPDATED);
                true
            }
            Err(e) => {
                self.api.report_unreported(&e, "更新资料失败");
                false
            }
        }
    }

    /// 启动时恢复会话：持有令牌则安装默认认证头并获取资料
    ///
    /// 同一时刻只执行一次；并发调用等待进行中的那一次结束。
    pub async fn init(&self) {
        let pending = {
            let mut flight = self.init_flight.lock().unwrap_or_else(PoisonError::into_inner);
            if flight.running {
                let (tx, rx) = oneshot::channel();
                flight.waiters.push(tx);
                Some(rx)
            } else {
                flight.running = true;
                None
            }
        };

        if let Some(rx) = pending {
            log::debug!("[Auth] waiting for session restore in flight");
            let _ = rx.await;
            return;
        }

        let _flight = InitFlightGuard(&self.init_flight);
        self.restore_session().await;
    }

    async fn restore_session(&self) {
        let Some(token) = self.api.storage().get(TOKEN_STORAGE_KEY).filter(|t| !t.is_empty()) else {
            return;
        };

        self.state().token.set(Some(token.clone()));
        self.api.set_default_token(&token);
        if self.fetch_profile().await.is_none() {
            log::info!("[Auth] stored token could not be used to restore the session");
        }
    }
}

#[cfg(test)]
mod tests;
