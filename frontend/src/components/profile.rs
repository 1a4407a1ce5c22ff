use crate::state::use_app_state;
use leptos::prelude::*;
use leptos::task::spawn_local;
use subconv_shared::ProfileUpdate;

/// 空输入表示不修改该字段
fn non_empty(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let session = use_app_state().session;
    let state = session.state();
    let profile = state.profile;
    let loading = state.loading;

    let initial = profile.get_untracked();
    let (username, set_username) =
        signal(initial.as_ref().map(|p| p.username.clone()).unwrap_or_default());
    let (email, set_email) = signal(initial.map(|p| p.email).unwrap_or_default());
    let (password, set_password) = signal(String::new());

    let save_session = session.clone();
    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let data = ProfileUpdate {
            username: non_empty(username.get()),
            email: non_empty(email.get()),
            password: non_empty(password.get()),
        };
        let session = save_session.clone();
        spawn_local(async move {
            if session.update_profile(data).await {
                set_password.set(String::new());
            }
        });
    };
    let on_logout = move |_| session.logout();

    view! {
        <div class="p-4 md:p-8 max-w-xl mx-auto">
            <form class="card bg-base-100 shadow-xl" on:submit=on_submit>
                <div class="card-body">
                    <h3 class="card-title">"个人资料"</h3>
                    <p class="text-sm text-base-content/70">
                        {move || profile.get().map(|p| {
                            let role = if p.is_admin { "管理员" } else { "普通用户" };
                            format!("#{} · {}", p.id, role)
                        })}
                    </p>
                    <div class="form-control">
                        <label class="label"><span class="label-text">"用户名"</span></label>
                        <input class="input input-bordered" prop:value=username
                            on:input=move |ev| set_username.set(event_target_value(&ev)) />
                    </div>
                    <div class="form-control">
                        <label class="label"><span class="label-text">"邮箱"</span></label>
                        <input type="email" class="input input-bordered" prop:value=email
                            on:input=move |ev| set_email.set(event_target_value(&ev)) />
                    </div>
                    <div class="form-control">
                        <label class="label"><span class="label-text">"新密码（留空不修改）"</span></label>
                        <input type="password" class="input input-bordered" prop:value=password
                            on:input=move |ev| set_password.set(event_target_value(&ev)) />
                    </div>
                    <div class="card-actions justify-between mt-4">
                        <button type="button" class="btn btn-outline btn-error" on:click=on_logout>
                            "退出登录"
                        </button>
                        <button class="btn btn-primary" disabled=move || loading.get()>"保存"</button>
                    </div>
                </div>
            </form>
        </div>
    }
}
