use crate::state::use_app_state;
use leptos::prelude::*;
use leptos::task::spawn_local;
use subconv_shared::{NodeCheckResult, NodeFiltersPatch};

#[component]
pub fn MonitoringPage() -> impl IntoView {
    let nodes = use_app_state().nodes;
    let loading = nodes.loading;
    let loaded = nodes.nodes;
    let (results, set_results) = signal(Vec::<NodeCheckResult>::new());
    let (force, set_force) = signal(false);

    if loaded.with_untracked(Vec::is_empty) {
        let nodes = nodes.clone();
        spawn_local(async move {
            if let Err(e) = nodes.fetch_nodes(NodeFiltersPatch::default()).await {
                log::debug!("[Monitoring] fetch_nodes failed: {}", e);
            }
        });
    }

    let check_all = move |_| {
        let nodes = nodes.clone();
        let ids: Vec<i64> = loaded.with_untracked(|list| list.iter().map(|n| n.id).collect());
        let force_check = force.get_untracked();
        spawn_local(async move {
            if let Ok(list) = nodes.check_nodes(&ids, force_check).await {
                set_results.set(list);
            }
        });
    };

    let node_name = move |id: i64| {
        loaded.with(|list| {
            list.iter()
                .find(|n| n.id == id)
                .map(|n| n.name.clone())
                .unwrap_or_else(|| format!("#{}", id))
        })
    };

    view! {
        <div class="p-4 md:p-8 max-w-7xl mx-auto space-y-6">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"节点检测"</h3>
                    <p class="text-base-content/70 text-sm">
                        "对已加载的 " {move || loaded.with(Vec::len)} " 个节点执行连通性检测"
                    </p>
                    <div class="flex items-center gap-4">
                        <label class="label cursor-pointer gap-2">
                            <input type="checkbox" class="checkbox checkbox-sm"
                                prop:checked=force
                                on:change=move |ev| set_force.set(event_target_checked(&ev)) />
                            <span class="label-text">"强制检测"</span>
                        </label>
                        <button class="btn btn-primary" disabled=move || loading.get() on:click=check_all>
                            {move || if loading.get() {
                                view! { <span class="loading loading-spinner"></span> "检测中..." }.into_any()
                            } else {
                                "检测全部".into_any()
                            }}
                        </button>
                    </div>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <table class="table w-full">
                        <thead>
                            <tr>
                                <th>"节点"</th>
                                <th>"状态"</th>
                                <th>"延迟"</th>
                                <th>"丢包"</th>
                                <th>"可用性"</th>
                                <th>"错误"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {move || results
                                .get()
                                .into_iter()
                                .map(|r| view! {
                                    <tr>
                                        <td>{node_name(r.node_id)}</td>
                                        <td>{r.status.as_str()}</td>
                                        <td>{r.ping_latency.map(|v| format!("{:.0} ms", v)).unwrap_or_default()}</td>
                                        <td>{r.packet_loss.map(|v| format!("{:.1}%", v)).unwrap_or_default()}</td>
                                        <td>{r.availability.map(|v| format!("{:.1}%", v)).unwrap_or_default()}</td>
                                        <td class="text-error text-xs">{r.error_message.clone().unwrap_or_default()}</td>
                                    </tr>
                                })
                                .collect_view()}
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}
