use std::collections::BTreeMap;

use crate::{Node, NodeStatus, NodeType};

/// 基于已加载节点计算的统计，不做缓存
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub error: usize,
    pub unknown: usize,
    pub disabled: usize,
    pub by_type: BTreeMap<NodeType, usize>,
    /// 没有国家的节点不计入
    pub by_country: BTreeMap<String, usize>,
}

impl NodeStats {
    pub fn from_nodes(nodes: &[Node]) -> Self {
        let mut stats = Self {
            total: nodes.len(),
            ..Self::default()
        };

        for node in nodes {
            *stats.status_slot(node.status) += 1;
            *stats.by_type.entry(node.node_type).or_default() += 1;
            if let Some(country) = node.country() {
                *stats.by_country.entry(country.to_string()).or_default() += 1;
            }
        }

        stats
    }

    pub fn count(&self, status: NodeStatus) -> usize {
        match status {
            NodeStatus::Active => self.active,
            NodeStatus::Inactive => self.inactive,
            NodeStatus::Error => self.error,
            NodeStatus::Unknown => self.unknown,
            NodeStatus::Disabled => self.disabled,
        }
    }

    fn status_slot(&mut self, status: NodeStatus) -> &mut usize {
        match status {
            NodeStatus::Active => &mut self.active,
            NodeStatus::Inactive => &mut self.inactive,
            NodeStatus::Error => &mut self.error,
            NodeStatus::Unknown => &mut self.unknown,
            NodeStatus::Disabled => &mut self.disabled,
        }
    }
}
