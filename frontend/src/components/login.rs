use crate::state::use_app_state;
use leptos::prelude::*;
use leptos::task::spawn_local;
use subconv_shared::{LoginCredentials, RegisterData};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Login,
    Register,
}

/// 登录 / 注册页
///
/// 登录成功后的跳转由路由服务监听认证状态完成。
#[component]
pub fn LoginPage() -> impl IntoView {
    let state = use_app_state();
    let loading = state.session.state().loading;

    let (mode, set_mode) = signal(Mode::Login);
    let (username, set_username) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let session = state.session.clone();
    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if username.get().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("请填写用户名和密码".to_string()));
            return;
        }
        if mode.get() == Mode::Register && email.get().is_empty() {
            set_error_msg.set(Some("请填写邮箱".to_string()));
            return;
        }
        set_error_msg.set(None);

        let session = session.clone();
        let current_mode = mode.get();
        spawn_local(async move {
            match current_mode {
                Mode::Login => {
                    let credentials = LoginCredentials {
                        username: username.get_untracked(),
                        password: password.get_untracked(),
                    };
                    session.login(credentials).await;
                }
                Mode::Register => {
                    let data = RegisterData {
                        username: username.get_untracked(),
                        email: email.get_untracked(),
                        password: password.get_untracked(),
                    };
                    if session.register(data).await {
                        set_password.set(String::new());
                        set_mode.set(Mode::Login);
                    }
                }
            }
        });
    };

    let tab_class = move |m: Mode| {
        if mode.get() == m { "tab tab-active" } else { "tab" }
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">{state.config.app_title.clone()}</h1>
                    <p class="text-base-content/70">"登录以管理节点与订阅"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <div role="tablist" class="tabs tabs-bordered px-8 pt-6">
                        <a role="tab" class=move || tab_class(Mode::Login) on:click=move |_| set_mode.set(Mode::Login)>
                            "登录"
                        </a>
                        <a role="tab" class=move || tab_class(Mode::Register) on:click=move |_| set_mode.set(Mode::Register)>
                            "注册"
                        </a>
                    </div>
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="username">
                                <span class="label-text">"用户名"</span>
                            </label>
                            <input
                                id="username"
                                type="text"
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <Show when=move || mode.get() == Mode::Register>
                            <div class="form-control">
                                <label class="label" for="email">
                                    <span class="label-text">"邮箱"</span>
                                </label>
                                <input
                                    id="email"
                                    type="email"
                                    on:input=move |ev| set_email.set(event_target_value(&ev))
                                    prop:value=email
                                    class="input input-bordered"
                                />
                            </div>
                        </Show>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"密码"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || loading.get()>
                                {move || match (loading.get(), mode.get()) {
                                    (true, _) => view! { <span class="loading loading-spinner"></span> "请稍候..." }.into_any(),
                                    (false, Mode::Login) => "登录".into_any(),
                                    (false, Mode::Register) => "注册".into_any(),
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
