//! 节点仓库
//!
//! 持有已加载的节点列表与过滤条件。后端是唯一的数据来源，
//! 本地列表只是最近一次请求结果加上增删改的就地修改。

use chrono::Utc;
use leptos::prelude::*;
use subconv_shared::protocol::{
    CountriesRequest, DeleteNodeRequest, GetNodeRequest, ListNodesRequest, NodeStatsRequest,
    RegionsRequest, UpdateNodeRequest,
};
use subconv_shared::{
    CheckNodesRequest, NewNode, Node, NodeCheckResult, NodeFilters, NodeFiltersPatch, NodeStats,
    NodeStatsSummary, NodeUpdate,
};

use crate::api::ApiClient;
use crate::error::ApiResult;

#[derive(Clone)]
pub struct NodeStore {
    api: ApiClient,
    pub nodes: RwSignal<Vec<Node>>,
    pub total: RwSignal<u64>,
    pub loading: RwSignal<bool>,
    pub filters: RwSignal<NodeFilters>,
}

impl NodeStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            nodes: RwSignal::new(Vec::new()),
            total: RwSignal::new(0),
            loading: RwSignal::new(false),
            filters: RwSignal::new(NodeFilters::initial()),
        }
    }

    /// 失败时补充上下文提示，然后原样返回
    fn reported<T>(&self, result: ApiResult<T>, fallback: &str) -> ApiResult<T> {
        if let Err(e) = &result {
            log::warn!("[Nodes] {}: {}", fallback, e);
            self.api.report_unreported(e, fallback);
        }
        result
    }

    // =========================================================
    // 远程操作
    // =========================================================

    /// 以当前条件合并 `extra` 查询列表，整体替换本地列表与总数
    ///
    /// `extra` 只作用于本次请求，不写回 `filters`。
    pub async fn fetch_nodes(&self, extra: NodeFiltersPatch) -> ApiResult<Vec<Node>> {
        let filters = self.filters.get_untracked().merge(&extra);

        self.loading.set(true);
        let result = self.api.call(&ListNodesRequest { filters }).await;
        self.loading.set(false);

        let page = self.reported(result, "获取节点列表失败")?;
        self.total.set(page.total);
        self.nodes.set(page.data.clone());
        Ok(page.data)
    }

    pub async fn get_node(&self, id: i64) -> ApiResult<Node> {
        let result = self.api.call(&GetNodeRequest { id }).await;
        self.reported(result, "获取节点详情失败")
    }

    /// 用返回的节点替换本地同 id 的条目；本地没有则不改动
    pub async fn update_node(&self, id: i64, update: NodeUpdate) -> ApiResult<Node> {
        let result = self.api.call(&UpdateNodeRequest { id, update }).await;
        let node = self.reported(result, "更新节点失败")?;

        self.nodes.update(|list| {
            if let Some(slot) = list.iter_mut().find(|n| n.id == id) {
                *slot = node.clone();
            }
        });
        self.api.notifier().success("节点更新成功");
        Ok(node)
    }

    /// 创建后直接追加，不检查过滤条件与分页
    pub async fn add_node(&self, data: NewNode) -> ApiResult<Node> {
        self.loading.set(true);
        let result = self.api.call(&data).await;
        self.loading.set(false);

        let node = self.reported(result, "添加节点失败")?;
        self.nodes.update(|list| list.push(node.clone()));
        self.api.notifier().success("节点添加成功");
        Ok(node)
    }

    /// 只移除第一个匹配的条目
    pub async fn delete_node(&self, id: i64) -> ApiResult<()> {
        let result = self.api.call(&DeleteNodeRequest { id }).await;
        self.reported(result, "删除节点失败")?;

        self.nodes.update(|list| {
            if let Some(pos) = list.iter().position(|n| n.id == id) {
                list.remove(pos);
            }
        });
        self.api.notifier().success("节点删除成功");
        Ok(())
    }

    /// 触发检测，并把结果写回本地匹配的节点
    ///
    /// 本地没有的节点结果直接丢弃；空 id 列表照常发送。
    pub async fn check_nodes(
        &self,
        node_ids: &[i64],
        force_check: bool,
    ) -> ApiResult<Vec<NodeCheckResult>> {
        let request = CheckNodesRequest {
            node_ids: node_ids.to_vec(),
            force_check,
        };

        self.loading.set(true);
        let result = self.api.call(&request).await;
        self.loading.set(false);

        let results = self.reported(result, "节点检测失败")?;
        let checked_at = Utc::now().naive_utc();
        self.nodes.update(|list| {
            for result in &results {
                if let Some(node) = list.iter_mut().find(|n| n.id == result.node_id) {
                    node.apply_check(result, checked_at);
                }
            }
        });
        self.api.notifier().success("节点检测完成");
        Ok(results)
    }

    pub async fn get_node_stats(&self) -> ApiResult<NodeStatsSummary> {
        let result = self.api.call(&NodeStatsRequest).await;
        self.reported(result, "获取节点统计失败")
    }

    pub async fn get_countries(&self) -> ApiResult<Vec<String>> {
        let result = self.api.call(&CountriesRequest).await;
        self.reported(result, "获取国家列表失败")
    }

    pub async fn get_regions(&self) -> ApiResult<Vec<String>> {
        let result = self.api.call(&RegionsRequest).await;
        self.reported(result, "获取地区列表失败")
    }

    // =========================================================
    // 本地状态
    // =========================================================

    /// 合并部分条件，不会触发请求
    pub fn set_filters(&self, patch: &NodeFiltersPatch) {
        self.filters.update(|filters| *filters = filters.merge(patch));
    }

    pub fn reset_filters(&self) {
        self.filters.set(NodeFilters::default());
    }

    /// 客户端过滤视图，每次访问重新计算（响应式）
    pub fn filtered_nodes(&self) -> Vec<Node> {
        let filters = self.filters.get();
        self.nodes.with(|list| filters.apply(list))
    }

    /// 已加载节点的统计（响应式）
    pub fn node_stats(&self) -> NodeStats {
        self.nodes.with(|list| NodeStats::from_nodes(list))
    }
}

#[cfg(test)]
mod tests;
