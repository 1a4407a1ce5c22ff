use std::time::Duration;

use crate::notify::Notice;
use crate::state::use_app_state;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;

/// toast 自动关闭时间
const NOTICE_TTL: Duration = Duration::from_secs(3);

/// 通知栈
#[component]
fn Toasts() -> impl IntoView {
    let notifier = use_app_state().notifier;
    let notices = notifier.notices();

    view! {
        <div class="toast toast-top toast-end z-50">
            <For
                each=move || notices.get()
                key=|notice: &Notice| notice.id
                children=move |notice: Notice| {
                    let id = notice.id;
                    set_timeout(move || notifier.dismiss(id), NOTICE_TTL);
                    view! {
                        <div class=format!("{} shadow-lg", notice.level.alert_class())>
                            <span>{notice.message}</span>
                            <button class="btn btn-ghost btn-xs" on:click=move |_| notifier.dismiss(id)>
                                "✕"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}

/// 顶部导航，只在登录后显示
#[component]
fn NavBar() -> impl IntoView {
    let state = use_app_state();
    let router = use_router();
    let current = router.current_route();
    let session = state.session.clone();
    let profile = state.session.state().profile;

    let on_logout = move |_| session.logout();

    view! {
        <div class="navbar bg-base-100 shadow-xl px-4">
            <div class="flex-1 gap-2">
                <Link to=AppRoute::Dashboard class="btn btn-ghost text-xl">
                    {state.config.app_title.clone()}
                </Link>
                <span class="badge badge-neutral hidden md:inline-flex">
                    "v" {state.config.app_version.clone()}
                </span>
            </div>
            <div class="flex-none">
                <ul class="menu menu-horizontal px-1 hidden lg:flex">
                    {AppRoute::NAV
                        .into_iter()
                        .map(|route| {
                            let class = move || {
                                if current.get() == Some(route) { "active" } else { "" }
                            };
                            view! {
                                <li>
                                    <span class=class>
                                        <Link to=route>{route.title()}</Link>
                                    </span>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
                <span class="mx-2 text-sm text-base-content/70">
                    {move || profile.get().map(|p| p.username).unwrap_or_default()}
                </span>
                <button on:click=on_logout class="btn btn-outline btn-error btn-sm">
                    "退出登录"
                </button>
            </div>
        </div>
    }
}

/// 页面骨架：导航栏 + 内容 + 通知
#[component]
pub fn Layout(children: Children) -> impl IntoView {
    let logged_in = use_app_state().session.state().logged_in_signal();

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <Show when=move || logged_in.get()>
                <NavBar />
            </Show>
            <main>{children()}</main>
            <Toasts />
        </div>
    }
}
