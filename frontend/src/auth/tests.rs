use leptos::prelude::*;
use serde_json::json;
use subconv_shared::protocol::{HttpMethod, PATH_LOGIN, PATH_ME, PATH_REGISTER};
use subconv_shared::{LoginCredentials, ProfileUpdate, RegisterData};

use super::TOKEN_STORAGE_KEY;
use crate::error::MSG_LOGIN_EXPIRED;
use crate::state::testing::{Harness, profile_json, url};
use crate::web::KeyValueStorage;

fn credentials() -> LoginCredentials {
    LoginCredentials {
        username: "alice".into(),
        password: "secret".into(),
    }
}

#[tokio::test]
async fn login_persists_token_and_loads_profile() {
    let h = Harness::new();
    h.http.mock_response(
        HttpMethod::Post,
        &url(PATH_LOGIN),
        200,
        json!({"access_token": "abc", "token_type": "bearer"}),
    );
    h.http
        .mock_response(HttpMethod::Get, &url(PATH_ME), 200, profile_json("alice"));

    assert!(h.app.session.login(credentials()).await);

    let state = h.app.session.state();
    assert_eq!(state.token(), Some("abc".into()));
    assert_eq!(state.profile().map(|p| p.username), Some("alice".into()));
    assert!(state.is_logged_in_untracked());
    assert!(!state.loading.get_untracked());
    assert_eq!(h.storage.get(TOKEN_STORAGE_KEY), Some("abc".into()));
    assert_eq!(h.messages(), vec!["登录成功".to_string()]);

    // 获取资料时携带新令牌
    let requests = h.http.requests();
    assert_eq!(requests[0].header("Authorization"), None);
    assert_eq!(requests[1].header("Authorization"), Some("Bearer abc"));
}

#[tokio::test]
async fn login_rejected_by_server() {
    let h = Harness::new();
    h.http.mock_response(
        HttpMethod::Post,
        &url(PATH_LOGIN),
        401,
        json!({"detail": "用户名或密码错误"}),
    );

    assert!(!h.app.session.login(credentials()).await);
    assert!(!h.app.session.state().is_logged_in_untracked());
    assert_eq!(h.messages(), vec!["用户名或密码错误".to_string()]);
    assert_eq!(h.http.request_count(), 1);
}

#[tokio::test]
async fn login_without_issued_token_fails() {
    let h = Harness::new();
    h.http
        .mock_response(HttpMethod::Post, &url(PATH_LOGIN), 200, json!({"token_type": "bearer"}));

    assert!(!h.app.session.login(credentials()).await);
    assert_eq!(h.app.session.state().token(), None);
    assert_eq!(h.storage.get(TOKEN_STORAGE_KEY), None);
    assert_eq!(h.messages(), vec!["登录失败".to_string()]);
}

#[tokio::test]
async fn login_fails_when_profile_cannot_be_loaded() {
    let h = Harness::new();
    h.http.mock_response(
        HttpMethod::Post,
        &url(PATH_LOGIN),
        200,
        json!({"access_token": "abc"}),
    );
    h.http
        .mock_response(HttpMethod::Get, &url(PATH_ME), 500, json!({"detail": "boom"}));

    assert!(!h.app.session.login(credentials()).await);
    assert!(!h.app.session.state().is_logged_in_untracked());
    assert_eq!(h.messages(), vec!["获取用户信息失败".to_string()]);
}

#[tokio::test]
async fn login_profile_401_reports_once() {
    let h = Harness::new();
    h.http.mock_response(
        HttpMethod::Post,
        &url(PATH_LOGIN),
        200,
        json!({"access_token": "abc"}),
    );
    h.http.mock_response(HttpMethod::Get, &url(PATH_ME), 401, json!({}));

    assert!(!h.app.session.login(credentials()).await);
    assert_eq!(h.app.session.state().token(), None);
    assert_eq!(h.storage.get(TOKEN_STORAGE_KEY), None);
    assert_eq!(h.messages(), vec![MSG_LOGIN_EXPIRED.to_string()]);
}

#[tokio::test]
async fn register_reports_outcome() {
    let h = Harness::new();
    h.http.mock_response(
        HttpMethod::Post,
        &url(PATH_REGISTER),
        200,
        profile_json("carol"),
    );
    let data = RegisterData {
        username: "carol".into(),
        email: "carol@example.com".into(),
        password: "hunter22".into(),
    };
    assert!(h.app.session.register(data.clone()).await);
    assert_eq!(h.messages(), vec!["注册成功，请登录".to_string()]);
    // 注册不会登录
    assert_eq!(h.app.session.state().token(), None);

    let dup = Harness::new();
    dup.http.mock_response(
        HttpMethod::Post,
        &url(PATH_REGISTER),
        400,
        json!({"detail": "用户名已存在"}),
    );
    assert!(!dup.app.session.register(data).await);
    assert_eq!(dup.messages(), vec!["用户名已存在".to_string()]);
}

#[tokio::test]
async fn fetch_profile_failure_is_silent() {
    let h = Harness::with_token("abc");
    h.http
        .mock_response(HttpMethod::Get, &url(PATH_ME), 503, json!({"detail": "maintenance"}));

    assert_eq!(h.app.session.fetch_profile().await, None);
    assert!(h.messages().is_empty());
    // 非 401 不会清除令牌
    assert_eq!(h.app.session.state().token(), Some("abc".into()));
}

#[tokio::test]
async fn logout_clears_everything() {
    let h = Harness::with_token("abc");
    h.http
        .mock_response(HttpMethod::Get, &url(PATH_ME), 200, profile_json("alice"));
    h.app.session.init().await;
    assert!(h.app.session.state().is_logged_in_untracked());

    h.app.session.logout();

    let state = h.app.session.state();
    assert_eq!(state.token(), None);
    assert_eq!(state.profile(), None);
    assert_eq!(h.storage.get(TOKEN_STORAGE_KEY), None);
    assert_eq!(h.app.api.default_token(), None);
    assert_eq!(h.messages(), vec!["已退出登录".to_string()]);

    // 没有会话时注销同样安全
    h.app.session.logout();
    assert_eq!(h.messages().len(), 2);
}

#[tokio::test]
async fn update_profile_replaces_local_profile() {
    let h = Harness::with_token("abc");
    h.http
        .mock_response(HttpMethod::Put, &url(PATH_ME), 200, profile_json("alice2"));

    let ok = h
        .app
        .session
        .update_profile(ProfileUpdate {
            username: Some("alice2".into()),
            ..ProfileUpdate::default()
        })
        .await;

    assert!(ok);
    assert_eq!(
        h.app.session.state().profile().map(|p| p.username),
        Some("alice2".into())
    );
    assert_eq!(h.messages(), vec!["资料更新成功".to_string()]);
}

#[tokio::test]
async fn init_restores_session_from_storage() {
    let h = Harness::with_token("abc");
    h.http
        .mock_response(HttpMethod::Get, &url(PATH_ME), 200, profile_json("alice"));

    assert!(h.app.session.state().needs_init());
    h.app.session.init().await;

    assert!(h.app.session.state().is_logged_in_untracked());
    assert!(!h.app.session.state().needs_init());
    assert_eq!(h.app.api.default_token(), Some("abc".into()));
    assert!(h.messages().is_empty());
}

#[tokio::test]
async fn init_without_token_does_nothing() {
    let h = Harness::new();
    h.app.session.init().await;
    assert_eq!(h.http.request_count(), 0);
    assert!(!h.app.session.state().is_logged_in_untracked());
}

#[tokio::test]
async fn init_with_expired_token_ends_logged_out() {
    let h = Harness::with_token("expired");
    h.http.mock_response(HttpMethod::Get, &url(PATH_ME), 401, json!({}));

    h.app.session.init().await;

    assert!(!h.app.session.state().is_logged_in_untracked());
    assert!(!h.app.session.state().needs_init());
    assert_eq!(h.storage.get(TOKEN_STORAGE_KEY), None);
}

#[tokio::test]
async fn wrong_password_over_stale_token_shows_server_reason() {
    let h = Harness::with_token("stale");
    h.http
        .mock_response(HttpMethod::Get, &url(PATH_ME), 503, json!({"detail": "maintenance"}));
    h.app.session.init().await;
    // 非 401 失败，旧令牌仍在会话中
    assert_eq!(h.app.session.state().token(), Some("stale".into()));

    h.http.mock_response(
        HttpMethod::Post,
        &url(PATH_LOGIN),
        401,
        json!({"detail": "用户名或密码错误"}),
    );
    assert!(!h.app.session.login(credentials()).await);

    assert_eq!(h.messages(), vec!["用户名或密码错误".to_string()]);
    assert_eq!(h.app.session.state().token(), None);
    assert_eq!(h.storage.get(TOKEN_STORAGE_KEY), None);
}

#[tokio::test]
async fn concurrent_init_fetches_profile_once() {
    let h = Harness::with_token("abc");
    h.http.yield_before_reply();
    h.http
        .mock_response(HttpMethod::Get, &url(PATH_ME), 200, profile_json("alice"));

    tokio::join!(h.app.session.init(), h.app.session.init());

    assert!(h.app.session.state().is_logged_in_untracked());
    assert_eq!(h.http.request_count(), 1);
    assert!(h.messages().is_empty());
}
