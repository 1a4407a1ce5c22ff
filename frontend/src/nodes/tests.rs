use leptos::prelude::*;
use serde_json::{Value, json};
use subconv_shared::protocol::{
    HttpMethod, PATH_CHECK, PATH_COUNTRIES, PATH_NODE_STATS, PATH_NODES, PATH_REGIONS,
};
use subconv_shared::{
    DEFAULT_PAGE_SIZE, INITIAL_PAGE_SIZE, NewNode, Node, NodeFilters, NodeFiltersPatch,
    NodeStatus, NodeType, NodeUpdate,
};

use crate::error::{ApiError, MSG_NOT_FOUND};
use crate::state::testing::{Harness, node_json, url};

fn node(id: i64, name: &str, status: &str) -> Node {
    serde_json::from_value(node_json(id, name, status)).unwrap()
}

fn page(nodes: Vec<Value>, total: u64) -> Value {
    json!({"data": nodes, "total": total, "page": 1, "pageSize": 100, "totalPages": 1})
}

fn node_url(id: i64) -> String {
    url(&format!("{}{}", PATH_NODES, id))
}

fn ids(nodes: &[Node]) -> Vec<i64> {
    nodes.iter().map(|n| n.id).collect()
}

#[tokio::test]
async fn fetch_nodes_replaces_list_and_total() {
    let h = Harness::new();
    let store = &h.app.nodes;
    store.nodes.set(vec![node(99, "Old", "active")]);
    h.http.mock_response(
        HttpMethod::Get,
        &url(PATH_NODES),
        200,
        page(vec![node_json(1, "A", "active"), node_json(2, "B", "error")], 42),
    );

    let fetched = store.fetch_nodes(NodeFiltersPatch::default()).await.unwrap();

    assert_eq!(ids(&fetched), vec![1, 2]);
    assert_eq!(ids(&store.nodes.get_untracked()), vec![1, 2]);
    assert_eq!(store.total.get_untracked(), 42);
    assert!(!store.loading.get_untracked());
}

#[tokio::test]
async fn fetch_nodes_merges_extra_for_this_request_only() {
    let h = Harness::new();
    let store = &h.app.nodes;
    store.set_filters(&NodeFiltersPatch::default().with_country("JP"));
    h.http
        .mock_response(HttpMethod::Get, &url(PATH_NODES), 200, page(vec![], 0));

    store
        .fetch_nodes(
            NodeFiltersPatch::default()
                .with_page(3)
                .with_status(Some(NodeStatus::Active)),
        )
        .await
        .unwrap();

    let query = h.http.requests()[0].query.clone();
    assert_eq!(
        query,
        vec![
            ("page".to_string(), "3".to_string()),
            ("pageSize".to_string(), INITIAL_PAGE_SIZE.to_string()),
            ("country".to_string(), "JP".to_string()),
            ("status".to_string(), "active".to_string()),
        ]
    );
    assert_eq!(store.filters.get_untracked().page, 1);
}

#[tokio::test]
async fn fetch_nodes_failure_keeps_list_and_clears_loading() {
    let h = Harness::new();
    let store = &h.app.nodes;
    store.nodes.set(vec![node(1, "A", "active")]);
    h.http.mock_response(HttpMethod::Get, &url(PATH_NODES), 500, json!({}));

    let err = store.fetch_nodes(NodeFiltersPatch::default()).await.unwrap_err();

    assert!(matches!(err, ApiError::Server { .. }));
    assert_eq!(ids(&store.nodes.get_untracked()), vec![1]);
    assert!(!store.loading.get_untracked());
    assert_eq!(h.messages(), vec!["服务器内部错误".to_string()]);
}

#[tokio::test]
async fn undecodable_list_uses_contextual_message() {
    let h = Harness::new();
    h.http
        .mock_raw(HttpMethod::Get, &url(PATH_NODES), 200, "not json");

    assert!(h.app.nodes.fetch_nodes(NodeFiltersPatch::default()).await.is_err());
    assert_eq!(h.messages(), vec!["获取节点列表失败".to_string()]);
}

#[tokio::test]
async fn get_node_does_not_touch_the_list() {
    let h = Harness::new();
    let store = &h.app.nodes;
    h.http
        .mock_response(HttpMethod::Get, &node_url(7), 200, node_json(7, "Seven", "unknown"));

    let fetched = store.get_node(7).await.unwrap();
    assert_eq!(fetched.name, "Seven");
    assert!(store.nodes.get_untracked().is_empty());

    h.http
        .mock_response(HttpMethod::Get, &node_url(8), 404, json!({"detail": "节点不存在"}));
    assert_eq!(store.get_node(8).await.unwrap_err(), ApiError::NotFound);
    assert_eq!(h.messages(), vec![MSG_NOT_FOUND.to_string()]);
}

#[tokio::test]
async fn update_node_replaces_matching_entry() {
    let h = Harness::new();
    let store = &h.app.nodes;
    store
        .nodes
        .set(vec![node(1, "A", "active"), node(2, "B", "active")]);
    h.http.mock_response(
        HttpMethod::Put,
        &node_url(2),
        200,
        node_json(2, "B-renamed", "inactive"),
    );

    let update = NodeUpdate {
        name: Some("B-renamed".into()),
        status: Some(NodeStatus::Inactive),
        ..NodeUpdate::default()
    };
    let updated = store.update_node(2, update).await.unwrap();

    let list = store.nodes.get_untracked();
    assert_eq!(updated.name, "B-renamed");
    assert_eq!(list[1].name, "B-renamed");
    assert_eq!(list[1].status, NodeStatus::Inactive);
    assert_eq!(list[0], node(1, "A", "active"));
    assert_eq!(
        h.http.requests()[0].body.as_deref(),
        Some(r#"{"name":"B-renamed","status":"inactive"}"#)
    );
    assert_eq!(h.messages(), vec!["节点更新成功".to_string()]);
}

#[tokio::test]
async fn update_node_absent_locally_changes_nothing() {
    let h = Harness::new();
    let store = &h.app.nodes;
    store.nodes.set(vec![node(1, "A", "active")]);
    h.http
        .mock_response(HttpMethod::Put, &node_url(5), 200, node_json(5, "E", "active"));

    store.update_node(5, NodeUpdate::default()).await.unwrap();
    assert_eq!(ids(&store.nodes.get_untracked()), vec![1]);
}

#[tokio::test]
async fn add_node_appends_unconditionally() {
    let h = Harness::new();
    let store = &h.app.nodes;
    store.set_filters(&NodeFiltersPatch::default().with_country("JP"));
    store.nodes.set(vec![node(1, "A", "active")]);
    h.http
        .mock_response(HttpMethod::Post, &url(PATH_NODES), 200, node_json(3, "C", "unknown"));

    let new_node = NewNode {
        name: "C".into(),
        node_type: NodeType::Vless,
        address: "c.example.com".into(),
        port: 443,
        country: None,
        region: None,
        notes: None,
    };
    store.add_node(new_node).await.unwrap();

    assert_eq!(ids(&store.nodes.get_untracked()), vec![1, 3]);
    assert!(!store.loading.get_untracked());
    assert_eq!(h.messages(), vec!["节点添加成功".to_string()]);
}

#[tokio::test]
async fn delete_node_removes_only_first_match() {
    let h = Harness::new();
    let store = &h.app.nodes;
    store.nodes.set(vec![
        node(1, "A", "active"),
        node(2, "B", "active"),
        node(1, "A-dup", "error"),
    ]);
    h.http
        .mock_response(HttpMethod::Delete, &node_url(1), 200, json!({"message": "节点删除成功"}));

    store.delete_node(1).await.unwrap();

    let list = store.nodes.get_untracked();
    assert_eq!(ids(&list), vec![2, 1]);
    assert_eq!(list[1].name, "A-dup");
    assert_eq!(h.messages(), vec!["节点删除成功".to_string()]);
}

#[tokio::test]
async fn delete_failure_keeps_local_entry() {
    let h = Harness::new();
    let store = &h.app.nodes;
    store.nodes.set(vec![node(1, "A", "active")]);
    h.http
        .mock_response(HttpMethod::Delete, &node_url(1), 403, json!({}));

    assert_eq!(store.delete_node(1).await.unwrap_err(), ApiError::Forbidden);
    assert_eq!(ids(&store.nodes.get_untracked()), vec![1]);
}

#[tokio::test]
async fn check_nodes_updates_matching_entries_only() {
    let h = Harness::new();
    let store = &h.app.nodes;
    store
        .nodes
        .set(vec![node(1, "A", "unknown"), node(2, "B", "unknown")]);
    h.http.mock_response(
        HttpMethod::Post,
        &url(PATH_CHECK),
        200,
        json!([
            {"node_id": 1, "status": "active", "ping_latency": 35.5, "packet_loss": 0.0,
             "speed_test": 120.0, "availability": 99.9, "error_message": null},
            {"node_id": 42, "status": "error", "ping_latency": null, "packet_loss": null,
             "speed_test": null, "availability": null, "error_message": "timeout"}
        ]),
    );

    let results = store.check_nodes(&[1, 42], true).await.unwrap();
    assert_eq!(results.len(), 2);

    let list = store.nodes.get_untracked();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].id, 1);
    assert_eq!(list[0].status, NodeStatus::Active);
    assert_eq!(list[0].ping_latency, Some(35.5));
    assert_eq!(list[0].availability, Some(99.9));
    assert!(list[0].last_check.is_some());
    assert_eq!(list[1], node(2, "B", "unknown"));
    assert!(!store.loading.get_untracked());

    assert_eq!(
        h.http.requests()[0].body.as_deref(),
        Some(r#"{"node_ids":[1,42],"force_check":true}"#)
    );
    assert_eq!(h.messages(), vec!["节点检测完成".to_string()]);
}

#[tokio::test]
async fn check_with_empty_ids_is_sent_as_is() {
    let h = Harness::new();
    h.http
        .mock_response(HttpMethod::Post, &url(PATH_CHECK), 200, json!([]));

    let results = h.app.nodes.check_nodes(&[], false).await.unwrap();
    assert!(results.is_empty());
    assert_eq!(
        h.http.requests()[0].body.as_deref(),
        Some(r#"{"node_ids":[],"force_check":false}"#)
    );
}

#[tokio::test]
async fn pass_through_reads() {
    let h = Harness::new();
    h.http.mock_response(
        HttpMethod::Get,
        &url(PATH_NODE_STATS),
        200,
        json!({"total_nodes": 3, "active_nodes": 2, "inactive_nodes": 0, "error_nodes": 1,
               "unknown_nodes": 0, "avg_latency": 40.0, "min_latency": 20.0, "max_latency": 60.0,
               "type_distribution": {"vless": 3}, "country_distribution": {"HK": 3},
               "last_updated": "2024-05-01T08:00:00"}),
    );
    h.http
        .mock_response(HttpMethod::Get, &url(PATH_COUNTRIES), 200, json!(["HK", "JP"]));
    h.http
        .mock_response(HttpMethod::Get, &url(PATH_REGIONS), 200, json!(["Asia"]));

    let summary = h.app.nodes.get_node_stats().await.unwrap();
    assert_eq!(summary.total_nodes, 3);
    assert_eq!(summary.type_distribution.get("vless"), Some(&3));
    assert_eq!(h.app.nodes.get_countries().await.unwrap(), vec!["HK", "JP"]);
    assert_eq!(h.app.nodes.get_regions().await.unwrap(), vec!["Asia"]);
    assert!(h.messages().is_empty());
}

#[tokio::test]
async fn unauthorized_from_node_call_ends_session() {
    let h = Harness::with_token("abc");
    h.http
        .mock_response(HttpMethod::Get, &url(PATH_REGIONS), 401, json!({}));

    assert!(h.app.nodes.get_regions().await.unwrap_err().is_unauthorized());
    assert_eq!(h.app.session.state().token(), None);
    assert_eq!(h.messages(), vec!["登录已过期，请重新登录".to_string()]);
}

#[test]
fn filters_merge_and_reset() {
    let h = Harness::new();
    let store = &h.app.nodes;
    assert_eq!(store.filters.get_untracked(), NodeFilters::initial());

    store.set_filters(
        &NodeFiltersPatch::default()
            .with_search("hk")
            .with_node_type(Some(NodeType::Trojan)),
    );
    store.set_filters(&NodeFiltersPatch::default().with_page(2));
    let filters = store.filters.get_untracked();
    assert_eq!(filters.search, "hk");
    assert_eq!(filters.node_type, Some(NodeType::Trojan));
    assert_eq!(filters.page, 2);
    assert_eq!(h.http.request_count(), 0);

    store.reset_filters();
    store.set_filters(&NodeFiltersPatch::default());
    assert_eq!(store.filters.get_untracked(), NodeFilters::default());
    assert_eq!(store.filters.get_untracked().page_size, DEFAULT_PAGE_SIZE);
}

#[test]
fn filtered_view_and_stats_follow_loaded_nodes() {
    let h = Harness::new();
    let store = &h.app.nodes;
    let mut tokyo = node(2, "Tokyo", "error");
    tokyo.country = Some("JP".into());
    store.nodes.set(vec![node(1, "HK-1", "active"), tokyo]);

    store.set_filters(&NodeFiltersPatch::default().with_search("hk"));
    assert_eq!(ids(&store.filtered_nodes()), vec![1]);

    let stats = store.node_stats();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.active, 1);
    assert_eq!(stats.error, 1);
    assert_eq!(stats.by_country.get("HK"), Some(&1));
    assert_eq!(stats.by_country.get("JP"), Some(&1));
}

#[tokio::test]
async fn server_and_client_filtering_can_diverge() {
    let h = Harness::new();
    let store = &h.app.nodes;
    store.set_filters(&NodeFiltersPatch::default().with_search("asia"));
    // 服务端按地区匹配了 "asia"，客户端只看名称和地址
    h.http.mock_response(
        HttpMethod::Get,
        &url(PATH_NODES),
        200,
        page(vec![node_json(1, "A", "active")], 1),
    );

    let fetched = store.fetch_nodes(NodeFiltersPatch::default()).await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert!(store.filtered_nodes().is_empty());
}
