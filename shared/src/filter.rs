//! 节点过滤条件
//!
//! 同一份条件有两条独立的使用路径：
//! - `query_pairs`：作为列表接口的查询参数，由服务端过滤
//! - `matches` / `apply`：在已加载的节点上做客户端过滤
//!
//! 两者互不依赖，结果可能不一致（例如服务端搜索还会匹配国家和地区）。

use crate::{Node, NodeStatus, NodeType};

/// 节点仓库创建时使用的分页大小
pub const INITIAL_PAGE_SIZE: u32 = 100;
/// `reset` 之后的分页大小
pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeFilters {
    pub page: u32,
    pub page_size: u32,
    /// 名称或地址的子串（忽略大小写），空串表示不过滤
    pub search: String,
    pub node_type: Option<NodeType>,
    pub country: String,
    pub region: String,
    pub status: Option<NodeStatus>,
}

impl Default for NodeFilters {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: String::new(),
            node_type: None,
            country: String::new(),
            region: String::new(),
            status: None,
        }
    }
}

impl NodeFilters {
    pub fn initial() -> Self {
        Self {
            page_size: INITIAL_PAGE_SIZE,
            ..Self::default()
        }
    }

    /// 合并部分更新，逐字段处理，未设置的字段保持原值
    pub fn merge(&self, patch: &NodeFiltersPatch) -> Self {
        Self {
            page: patch.page.unwrap_or(self.page),
            page_size: patch.page_size.unwrap_or(self.page_size),
            search: patch.search.clone().unwrap_or_else(|| self.search.clone()),
            node_type: patch.node_type.unwrap_or(self.node_type),
            country: patch.country.clone().unwrap_or_else(|| self.country.clone()),
            region: patch.region.clone().unwrap_or_else(|| self.region.clone()),
            status: patch.status.unwrap_or(self.status),
        }
    }

    /// 节点是否满足所有非空条件
    pub fn matches(&self, node: &Node) -> bool {
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            if !node.name.to_lowercase().contains(&needle)
                && !node.address.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if let Some(node_type) = self.node_type {
            if node.node_type != node_type {
                return false;
            }
        }
        if !self.country.is_empty() && node.country.as_deref() != Some(self.country.as_str()) {
            return false;
        }
        if !self.region.is_empty() && node.region.as_deref() != Some(self.region.as_str()) {
            return false;
        }
        if let Some(status) = self.status {
            if node.status != status {
                return false;
            }
        }
        true
    }

    /// 客户端过滤，保持原有顺序
    pub fn apply(&self, nodes: &[Node]) -> Vec<Node> {
        nodes.iter().filter(|n| self.matches(n)).cloned().collect()
    }

    /// 服务端查询参数，空条件不发送
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        if let Some(node_type) = self.node_type {
            pairs.push(("node_type", node_type.as_str().to_string()));
        }
        if !self.country.is_empty() {
            pairs.push(("country", self.country.clone()));
        }
        if !self.region.is_empty() {
            pairs.push(("region", self.region.clone()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        pairs
    }
}

/// 过滤条件的部分更新
///
/// `node_type` / `status` 使用双层 `Option`：`Some(None)` 表示清除该条件。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeFiltersPatch {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub node_type: Option<Option<NodeType>>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub status: Option<Option<NodeStatus>>,
}

impl NodeFiltersPatch {
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_node_type(mut self, node_type: Option<NodeType>) -> Self {
        self.node_type = Some(node_type);
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_status(mut self, status: Option<NodeStatus>) -> Self {
        self.status = Some(status);
        self
    }
}
