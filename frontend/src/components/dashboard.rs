use crate::state::use_app_state;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use subconv_shared::{NodeFiltersPatch, NodeStatsSummary, NodeStatus};

#[component]
pub fn DashboardPage() -> impl IntoView {
    let state = use_app_state();
    let nodes = state.nodes.clone();
    let (summary, set_summary) = signal(Option::<NodeStatsSummary>::None);

    // 初始加载：本地列表 + 服务端统计
    {
        let nodes = nodes.clone();
        spawn_local(async move {
            if let Err(e) = nodes.fetch_nodes(NodeFiltersPatch::default()).await {
                log::debug!("[Dashboard] fetch_nodes failed: {}", e);
            }
            if let Ok(data) = nodes.get_node_stats().await {
                set_summary.set(Some(data));
            }
        });
    }

    let stats = {
        let nodes = nodes.clone();
        Memo::new(move |_| nodes.node_stats())
    };
    let total = nodes.total;
    let username = move || {
        state
            .session
            .state()
            .profile
            .get()
            .map(|p| p.username)
            .unwrap_or_default()
    };

    let latency = move || {
        summary
            .get()
            .and_then(|s| s.avg_latency)
            .map(|v| format!("{:.0} ms", v))
            .unwrap_or_else(|| "-".to_string())
    };

    view! {
        <div class="p-4 md:p-8 max-w-7xl mx-auto space-y-8">
            <div>
                <h2 class="text-2xl font-bold">"欢迎回来，" {username}</h2>
                <p class="text-base-content/70">"节点概览"</p>
            </div>

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-title">"已加载节点"</div>
                    <div class="stat-value text-primary">{move || stats.get().total}</div>
                    <div class="stat-desc">"服务端共 " {move || total.get()} " 个"</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"在线"</div>
                    <div class="stat-value text-success">{move || stats.get().count(NodeStatus::Active)}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"异常"</div>
                    <div class="stat-value text-error">{move || stats.get().count(NodeStatus::Error)}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"平均延迟"</div>
                    <div class="stat-value text-secondary text-2xl">{latency}</div>
                </div>
            </div>

            <div class="grid md:grid-cols-2 gap-6">
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title">"类型分布"</h3>
                        <ul class="space-y-1">
                            {move || {
                                stats
                                    .get()
                                    .by_type
                                    .into_iter()
                                    .map(|(t, n)| view! {
                                        <li class="flex justify-between">
                                            <span class="badge badge-outline">{t.as_str()}</span>
                                            <span>{n}</span>
                                        </li>
                                    })
                                    .collect_view()
                            }}
                        </ul>
                    </div>
                </div>
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title">"国家分布"</h3>
                        <ul class="space-y-1">
                            {move || {
                                stats
                                    .get()
                                    .by_country
                                    .into_iter()
                                    .map(|(c, n)| view! {
                                        <li class="flex justify-between">
                                            <span>{c}</span>
                                            <span>{n}</span>
                                        </li>
                                    })
                                    .collect_view()
                            }}
                        </ul>
                    </div>
                </div>
            </div>

            <div class="flex gap-4">
                <Link to=AppRoute::Nodes class="btn btn-primary">"管理节点"</Link>
                <Link to=AppRoute::Monitoring class="btn btn-outline">"监控检测"</Link>
            </div>
        </div>
    }
}
