use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub mod filter;
pub mod protocol;
pub mod stats;

pub use filter::{DEFAULT_PAGE_SIZE, INITIAL_PAGE_SIZE, NodeFilters, NodeFiltersPatch};
pub use stats::NodeStats;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const BEARER_PREFIX: &str = "Bearer ";

// =========================================================
// 用户模型 (User Models)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_admin: bool,
    pub last_login: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterData {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// 资料更新：未设置的字段不会被序列化，后端保留原值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// 登录接口返回的令牌
///
/// `access_token` 缺失视为登录失败。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
}

// =========================================================
// 节点模型 (Node Models)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    V2ray,
    Trojan,
    Ssr,
    Ss,
    Vless,
    Hysteria2,
}

impl NodeType {
    pub const ALL: [NodeType; 6] = [
        NodeType::V2ray,
        NodeType::Trojan,
        NodeType::Ssr,
        NodeType::Ss,
        NodeType::Vless,
        NodeType::Hysteria2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::V2ray => "v2ray",
            NodeType::Trojan => "trojan",
            NodeType::Ssr => "ssr",
            NodeType::Ss => "ss",
            NodeType::Vless => "vless",
            NodeType::Hysteria2 => "hysteria2",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 节点状态
///
/// `Disabled` 由后端用于标记不参与检测的节点。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Active,
    Inactive,
    Error,
    Unknown,
    Disabled,
}

impl NodeStatus {
    pub const ALL: [NodeStatus; 5] = [
        NodeStatus::Active,
        NodeStatus::Inactive,
        NodeStatus::Error,
        NodeStatus::Unknown,
        NodeStatus::Disabled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Active => "active",
            NodeStatus::Inactive => "inactive",
            NodeStatus::Error => "error",
            NodeStatus::Unknown => "unknown",
            NodeStatus::Disabled => "disabled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: i64,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub port: u16,
    pub node_type: NodeType,
    pub country: Option<String>,
    pub region: Option<String>,
    pub status: NodeStatus,
    pub ping_latency: Option<f64>,
    pub packet_loss: Option<f64>,
    pub speed_test: Option<f64>,
    pub availability: Option<f64>,
    pub last_check: Option<NaiveDateTime>,
    #[serde(default)]
    pub tls: bool,
    pub input_record_id: Option<i64>,
    #[serde(default)]
    pub ignore_updates: bool,
}

impl Node {
    /// 非空国家字段
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref().filter(|c| !c.is_empty())
    }

    /// 用检测结果覆盖本地检测字段，并记录检测时间
    pub fn apply_check(&mut self, result: &NodeCheckResult, checked_at: NaiveDateTime) {
        self.status = result.status;
        self.ping_latency = result.ping_latency;
        self.packet_loss = result.packet_loss;
        self.speed_test = result.speed_test;
        self.availability = result.availability;
        self.last_check = Some(checked_at);
    }
}

/// 分页列表响应
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodePage {
    #[serde(default)]
    pub data: Vec<Node>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default, rename = "pageSize")]
    pub page_size: u32,
    #[serde(default, rename = "totalPages")]
    pub total_pages: u32,
}

/// 手动添加节点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNode {
    pub name: String,
    pub node_type: NodeType,
    pub address: String,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_updates: Option<bool>,
}

// =========================================================
// 检测与统计 (Monitoring)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckNodesRequest {
    pub node_ids: Vec<i64>,
    pub force_check: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeCheckResult {
    pub node_id: i64,
    pub status: NodeStatus,
    pub ping_latency: Option<f64>,
    pub packet_loss: Option<f64>,
    pub speed_test: Option<f64>,
    pub availability: Option<f64>,
    pub error_message: Option<String>,
}

/// 服务端预计算的节点统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeStatsSummary {
    #[serde(default)]
    pub total_nodes: u64,
    #[serde(default)]
    pub active_nodes: u64,
    #[serde(default)]
    pub inactive_nodes: u64,
    #[serde(default)]
    pub error_nodes: u64,
    #[serde(default)]
    pub unknown_nodes: u64,
    pub avg_latency: Option<f64>,
    pub min_latency: Option<f64>,
    pub max_latency: Option<f64>,
    #[serde(default)]
    pub type_distribution: std::collections::BTreeMap<String, u64>,
    #[serde(default)]
    pub country_distribution: std::collections::BTreeMap<String, u64>,
    pub last_updated: Option<String>,
}

// =========================================================
// 错误响应 (Error Body)
// =========================================================

/// 后端错误响应体：`{"detail": ...}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<ErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Fields(Vec<FieldError>),
    Other(serde_json::Value),
}

/// 字段级校验错误
#[derive(Debug, Clone, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub loc: Vec<serde_json::Value>,
}

impl ErrorBody {
    /// 宽松解析：无法识别的响应体视为没有 detail
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    pub fn message(&self) -> Option<&str> {
        match &self.detail {
            Some(ErrorDetail::Message(msg)) if !msg.is_empty() => Some(msg),
            _ => None,
        }
    }

    pub fn field_messages(&self) -> Option<Vec<&str>> {
        match &self.detail {
            Some(ErrorDetail::Fields(errors)) => {
                Some(errors.iter().map(|e| e.msg.as_str()).collect())
            }
            _ => None,
        }
    }
}
