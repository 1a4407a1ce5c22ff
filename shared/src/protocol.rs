use crate::{
    AccessToken, CheckNodesRequest, LoginCredentials, NewNode, Node, NodeCheckResult,
    NodeFilters, NodePage, NodeStatsSummary, NodeUpdate, ProfileUpdate, RegisterData,
    UserProfile,
};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

// =========================================================
// 接口路径 (Endpoint Paths)
// =========================================================

pub const PATH_LOGIN: &str = "/auth/login-json";
pub const PATH_REGISTER: &str = "/auth/register";
pub const PATH_ME: &str = "/auth/me";
pub const PATH_NODES: &str = "/api/nodes/";
pub const PATH_NODE_STATS: &str = "/api/nodes/stats/summary";
pub const PATH_COUNTRIES: &str = "/api/nodes/countries/list";
pub const PATH_REGIONS: &str = "/api/nodes/regions/list";
pub const PATH_CHECK: &str = "/api/monitoring/check";

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest {
    /// The JSON body type; `()` for requests without a body.
    type Body: Serialize;
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether this call exchanges credentials for a token.
    /// A 401 here means bad credentials, not an expired session.
    const EXCHANGES_CREDENTIALS: bool = false;

    /// The URL path, relative to the API base URL.
    fn path(&self) -> String;

    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn body(&self) -> Option<&Self::Body> {
        None
    }
}

fn node_path(id: i64) -> String {
    format!("{}{}", PATH_NODES, id)
}

// =========================================================
// 认证 (Auth)
// =========================================================

impl ApiRequest for LoginCredentials {
    type Body = Self;
    type Response = AccessToken;
    const METHOD: HttpMethod = HttpMethod::Post;
    const EXCHANGES_CREDENTIALS: bool = true;

    fn path(&self) -> String {
        PATH_LOGIN.to_string()
    }

    fn body(&self) -> Option<&Self> {
        Some(self)
    }
}

/// 注册只关心是否成功，响应体被忽略
impl ApiRequest for RegisterData {
    type Body = Self;
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        PATH_REGISTER.to_string()
    }

    fn body(&self) -> Option<&Self> {
        Some(self)
    }
}

/// 当前登录用户
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentUserRequest;

impl ApiRequest for CurrentUserRequest {
    type Body = ();
    type Response = UserProfile;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        PATH_ME.to_string()
    }
}

impl ApiRequest for ProfileUpdate {
    type Body = Self;
    type Response = UserProfile;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        PATH_ME.to_string()
    }

    fn body(&self) -> Option<&Self> {
        Some(self)
    }
}

// =========================================================
// 节点 (Nodes)
// =========================================================

/// 分页列表查询
#[derive(Debug, Clone)]
pub struct ListNodesRequest {
    pub filters: NodeFilters,
}

impl ApiRequest for ListNodesRequest {
    type Body = ();
    type Response = NodePage;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        PATH_NODES.to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        self.filters.query_pairs()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetNodeRequest {
    pub id: i64,
}

impl ApiRequest for GetNodeRequest {
    type Body = ();
    type Response = Node;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        node_path(self.id)
    }
}

impl ApiRequest for NewNode {
    type Body = Self;
    type Response = Node;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        PATH_NODES.to_string()
    }

    fn body(&self) -> Option<&Self> {
        Some(self)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateNodeRequest {
    pub id: i64,
    pub update: NodeUpdate,
}

impl ApiRequest for UpdateNodeRequest {
    type Body = NodeUpdate;
    type Response = Node;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        node_path(self.id)
    }

    fn body(&self) -> Option<&NodeUpdate> {
        Some(&self.update)
    }
}

/// 删除节点，后端返回 `{"message": ...}`，内容不使用
#[derive(Debug, Clone, Copy)]
pub struct DeleteNodeRequest {
    pub id: i64,
}

impl ApiRequest for DeleteNodeRequest {
    type Body = ();
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        node_path(self.id)
    }
}

impl ApiRequest for CheckNodesRequest {
    type Body = Self;
    type Response = Vec<NodeCheckResult>;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        PATH_CHECK.to_string()
    }

    fn body(&self) -> Option<&Self> {
        Some(self)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NodeStatsRequest;

impl ApiRequest for NodeStatsRequest {
    type Body = ();
    type Response = NodeStatsSummary;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        PATH_NODE_STATS.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CountriesRequest;

impl ApiRequest for CountriesRequest {
    type Body = ();
    type Response = Vec<String>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        PATH_COUNTRIES.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RegionsRequest;

impl ApiRequest for RegionsRequest {
    type Body = ();
    type Response = Vec<String>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        PATH_REGIONS.to_string()
    }
}
