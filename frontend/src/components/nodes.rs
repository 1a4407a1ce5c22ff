use crate::state::use_app_state;
use leptos::prelude::*;
use leptos::task::spawn_local;
use subconv_shared::{NewNode, Node, NodeFiltersPatch, NodeStatus, NodeType};

fn status_badge(status: NodeStatus) -> &'static str {
    match status {
        NodeStatus::Active => "badge badge-success",
        NodeStatus::Inactive => "badge badge-ghost",
        NodeStatus::Error => "badge badge-error",
        NodeStatus::Unknown => "badge badge-warning",
        NodeStatus::Disabled => "badge badge-neutral",
    }
}

fn format_latency(value: Option<f64>) -> String {
    value.map(|v| format!("{:.0} ms", v)).unwrap_or_else(|| "-".to_string())
}

/// 手动添加节点的表单
#[component]
fn AddNodeForm() -> impl IntoView {
    let nodes = use_app_state().nodes;
    let (name, set_name) = signal(String::new());
    let (address, set_address) = signal(String::new());
    let (port, set_port) = signal(String::from("443"));
    let (node_type, set_node_type) = signal(NodeType::V2ray);
    let (country, set_country) = signal(String::new());
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Ok(port_value) = port.get().trim().parse::<u16>() else {
            set_error_msg.set(Some("端口必须是 1-65535 之间的数字".to_string()));
            return;
        };
        if name.get().trim().is_empty() || address.get().trim().is_empty() {
            set_error_msg.set(Some("请填写名称和地址".to_string()));
            return;
        }
        set_error_msg.set(None);

        let country_value = country.get();
        let data = NewNode {
            name: name.get().trim().to_string(),
            node_type: node_type.get(),
            address: address.get().trim().to_string(),
            port: port_value,
            country: (!country_value.is_empty()).then_some(country_value),
            region: None,
            notes: None,
        };

        let nodes = nodes.clone();
        spawn_local(async move {
            if nodes.add_node(data).await.is_ok() {
                set_name.set(String::new());
                set_address.set(String::new());
            }
        });
    };

    view! {
        <form class="card bg-base-100 shadow-xl" on:submit=on_submit>
            <div class="card-body">
                <h3 class="card-title">"添加节点"</h3>
                <Show when=move || error_msg.get().is_some()>
                    <div role="alert" class="alert alert-error text-sm py-2">
                        <span>{move || error_msg.get().unwrap_or_default()}</span>
                    </div>
                </Show>
                <div class="grid md:grid-cols-5 gap-2">
                    <input class="input input-bordered" placeholder="名称"
                        prop:value=name on:input=move |ev| set_name.set(event_target_value(&ev)) />
                    <input class="input input-bordered" placeholder="地址"
                        prop:value=address on:input=move |ev| set_address.set(event_target_value(&ev)) />
                    <input class="input input-bordered" placeholder="端口"
                        prop:value=port on:input=move |ev| set_port.set(event_target_value(&ev)) />
                    <select class="select select-bordered"
                        on:change=move |ev| {
                            if let Some(t) = NodeType::parse(&event_target_value(&ev)) {
                                set_node_type.set(t);
                            }
                        }>
                        {NodeType::ALL
                            .into_iter()
                            .map(|t| view! { <option value=t.as_str()>{t.as_str()}</option> })
                            .collect_view()}
                    </select>
                    <input class="input input-bordered" placeholder="国家（可选）"
                        prop:value=country on:input=move |ev| set_country.set(event_target_value(&ev)) />
                </div>
                <div class="card-actions justify-end">
                    <button class="btn btn-primary">"添加"</button>
                </div>
            </div>
        </form>
    }
}

/// 过滤条件栏
///
/// 修改条件只更新本地视图，点击"查询"才向服务端请求。
#[component]
fn FilterBar() -> impl IntoView {
    let nodes = use_app_state().nodes;
    let filters = nodes.filters;
    let (countries, set_countries) = signal(Vec::<String>::new());

    {
        let nodes = nodes.clone();
        spawn_local(async move {
            if let Ok(list) = nodes.get_countries().await {
                set_countries.set(list);
            }
        });
    }

    let set = {
        let nodes = nodes.clone();
        move |patch: NodeFiltersPatch| nodes.set_filters(&patch)
    };
    let set_search = set.clone();
    let set_type = set.clone();
    let set_country = set.clone();
    let set_status = set;

    let query = {
        let nodes = nodes.clone();
        move |_| {
            let nodes = nodes.clone();
            spawn_local(async move {
                if let Err(e) = nodes.fetch_nodes(NodeFiltersPatch::default()).await {
                    log::debug!("[Nodes] fetch_nodes failed: {}", e);
                }
            });
        }
    };
    let reset = move |_| nodes.reset_filters();

    view! {
        <div class="flex flex-wrap gap-2 items-center">
            <input class="input input-bordered input-sm" placeholder="搜索名称或地址"
                prop:value=move || filters.get().search
                on:input=move |ev| set_search(NodeFiltersPatch::default().with_search(event_target_value(&ev))) />
            <select class="select select-bordered select-sm"
                on:change=move |ev| set_type(NodeFiltersPatch::default().with_node_type(NodeType::parse(&event_target_value(&ev))))>
                <option value="">"全部类型"</option>
                {NodeType::ALL
                    .into_iter()
                    .map(|t| view! { <option value=t.as_str()>{t.as_str()}</option> })
                    .collect_view()}
            </select>
            <select class="select select-bordered select-sm"
                on:change=move |ev| set_country(NodeFiltersPatch::default().with_country(event_target_value(&ev)))>
                <option value="">"全部国家"</option>
                {move || countries
                    .get()
                    .into_iter()
                    .map(|c| view! { <option value=c.clone()>{c.clone()}</option> })
                    .collect_view()}
            </select>
            <select class="select select-bordered select-sm"
                on:change=move |ev| set_status(NodeFiltersPatch::default().with_status(NodeStatus::parse(&event_target_value(&ev))))>
                <option value="">"全部状态"</option>
                {NodeStatus::ALL
                    .into_iter()
                    .map(|s| view! { <option value=s.as_str()>{s.as_str()}</option> })
                    .collect_view()}
            </select>
            <button class="btn btn-sm btn-primary" on:click=query>"查询"</button>
            <button class="btn btn-sm btn-ghost" on:click=reset>"重置"</button>
        </div>
    }
}

#[component]
fn NodeRow(node: Node) -> impl IntoView {
    let nodes = use_app_state().nodes;
    let id = node.id;
    let check_store = nodes.clone();
    let on_check = move |_| {
        let nodes = check_store.clone();
        spawn_local(async move {
            if let Err(e) = nodes.check_nodes(&[id], true).await {
                log::debug!("[Nodes] check_nodes failed: {}", e);
            }
        });
    };
    let on_delete = move |_| {
        let nodes = nodes.clone();
        spawn_local(async move {
            if let Err(e) = nodes.delete_node(id).await {
                log::debug!("[Nodes] delete_node failed: {}", e);
            }
        });
    };

    view! {
        <tr>
            <td>
                <div class="font-bold">{node.name.clone()}</div>
                <div class="text-xs opacity-60">{format!("{}:{}", node.address, node.port)}</div>
            </td>
            <td><span class="badge badge-outline">{node.node_type.as_str()}</span></td>
            <td class="hidden md:table-cell">{node.country.clone().unwrap_or_default()}</td>
            <td><span class=status_badge(node.status)>{node.status.as_str()}</span></td>
            <td class="hidden md:table-cell">{format_latency(node.ping_latency)}</td>
            <td class="text-right space-x-1">
                <button class="btn btn-xs btn-outline" on:click=on_check>"检测"</button>
                <button class="btn btn-xs btn-error btn-outline" on:click=on_delete>"删除"</button>
            </td>
        </tr>
    }
}

#[component]
pub fn NodesPage() -> impl IntoView {
    let nodes = use_app_state().nodes;
    let loading = nodes.loading;
    let total = nodes.total;

    {
        let nodes = nodes.clone();
        spawn_local(async move {
            if let Err(e) = nodes.fetch_nodes(NodeFiltersPatch::default()).await {
                log::debug!("[Nodes] fetch_nodes failed: {}", e);
            }
        });
    }

    let filtered = {
        let nodes = nodes.clone();
        Memo::new(move |_| nodes.filtered_nodes())
    };

    view! {
        <div class="p-4 md:p-8 max-w-7xl mx-auto space-y-6">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="flex flex-col gap-4 p-6 pb-2">
                        <div class="flex items-center justify-between">
                            <div>
                                <h3 class="card-title">"节点列表"</h3>
                                <p class="text-base-content/70 text-sm">
                                    "显示 " {move || filtered.with(Vec::len)} " / 共 " {move || total.get()} " 个节点"
                                </p>
                            </div>
                            <Show when=move || loading.get()>
                                <span class="loading loading-spinner"></span>
                            </Show>
                        </div>
                        <FilterBar />
                    </div>
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"名称"</th>
                                    <th>"类型"</th>
                                    <th class="hidden md:table-cell">"国家"</th>
                                    <th>"状态"</th>
                                    <th class="hidden md:table-cell">"延迟"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || filtered.with(Vec::is_empty) && !loading.get()>
                                    <tr>
                                        <td colspan="6" class="text-center py-8 text-base-content/50">
                                            "没有符合条件的节点"
                                        </td>
                                    </tr>
                                </Show>
                                {move || filtered
                                    .get()
                                    .into_iter()
                                    .map(|node| view! { <NodeRow node=node /> })
                                    .collect_view()}
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>
            <AddNodeForm />
        </div>
    }
}
