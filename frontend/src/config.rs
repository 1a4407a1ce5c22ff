// =========================================================
// 运行时配置 (Runtime Configuration)
// =========================================================

/// 这些是默认值，构建时没有设置对应环境变量则使用这些值
const DEFAULT_API_BASE_URL: &str = "";
const DEFAULT_APP_TITLE: &str = "订阅转换器";
const DEFAULT_APP_VERSION: &str = "1.0.0";
const DEFAULT_DEV_SERVER_PORT: u16 = 3000;
const DEFAULT_BACKEND_HOST: &str = "localhost";
const DEFAULT_BACKEND_PORT: u16 = 8001;
const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 30_000;

/// 环境变量读取接口
pub trait EnvAdapter {
    fn var(&self, name: &str) -> Option<String>;
}

/// 构建时注入的环境变量
///
/// WASM 中没有进程环境，只能在编译期通过 `option_env!` 读取。
pub struct BuildEnv;

impl EnvAdapter for BuildEnv {
    fn var(&self, name: &str) -> Option<String> {
        let value = match name {
            "SUBCONV_API_BASE_URL" => option_env!("SUBCONV_API_BASE_URL"),
            "SUBCONV_APP_TITLE" => option_env!("SUBCONV_APP_TITLE"),
            "SUBCONV_APP_VERSION" => option_env!("SUBCONV_APP_VERSION"),
            "SUBCONV_DEV_SERVER_PORT" => option_env!("SUBCONV_DEV_SERVER_PORT"),
            "SUBCONV_BACKEND_HOST" => option_env!("SUBCONV_BACKEND_HOST"),
            "SUBCONV_BACKEND_PORT" => option_env!("SUBCONV_BACKEND_PORT"),
            "SUBCONV_REQUEST_TIMEOUT_MS" => option_env!("SUBCONV_REQUEST_TIMEOUT_MS"),
            _ => None,
        };
        value.map(str::to_string)
    }
}

/// 应用配置，启动时读取一次
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 空串表示与页面同源
    pub api_base_url: String,
    pub app_title: String,
    pub app_version: String,
    pub dev_server_port: u16,
    pub backend_host: String,
    pub backend_port: u16,
    pub request_timeout_ms: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            app_title: DEFAULT_APP_TITLE.to_string(),
            app_version: DEFAULT_APP_VERSION.to_string(),
            dev_server_port: DEFAULT_DEV_SERVER_PORT,
            backend_host: DEFAULT_BACKEND_HOST.to_string(),
            backend_port: DEFAULT_BACKEND_PORT,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl AppConfig {
    pub fn new(env: &dyn EnvAdapter) -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env
                .var("SUBCONV_API_BASE_URL")
                .unwrap_or(defaults.api_base_url),
            app_title: env
                .var("SUBCONV_APP_TITLE")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.app_title),
            app_version: env
                .var("SUBCONV_APP_VERSION")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.app_version),
            dev_server_port: parse_or(env, "SUBCONV_DEV_SERVER_PORT", defaults.dev_server_port),
            backend_host: env
                .var("SUBCONV_BACKEND_HOST")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.backend_host),
            backend_port: parse_or(env, "SUBCONV_BACKEND_PORT", defaults.backend_port),
            request_timeout_ms: parse_or(
                env,
                "SUBCONV_REQUEST_TIMEOUT_MS",
                defaults.request_timeout_ms,
            ),
        }
    }

    /// 开发代理转发的后端地址
    pub fn backend_origin(&self) -> String {
        format!("http://{}:{}", self.backend_host, self.backend_port)
    }

    /// 页面标题，例如 "节点管理 - 订阅转换器"
    pub fn page_title(&self, route_title: &str) -> String {
        format!("{} - {}", route_title, self.app_title)
    }
}

fn parse_or<T: std::str::FromStr>(env: &dyn EnvAdapter, name: &str, default: T) -> T {
    match env.var(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("[Config] invalid value for {}: {:?}, using default", name, raw);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MockEnv {
        vars: HashMap<String, String>,
    }

    impl MockEnv {
        fn new(pairs: &[(&str, &str)]) -> Self {
            Self {
                vars: pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }
    }

    impl EnvAdapter for MockEnv {
        fn var(&self, name: &str) -> Option<String> {
            self.vars.get(name).cloned()
        }
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = AppConfig::new(&MockEnv::new(&[]));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api_base_url, "");
        assert_eq!(config.request_timeout_ms, 30_000);
        assert_eq!(config.backend_origin(), "http://localhost:8001");
    }

    #[test]
    fn values_override_defaults() {
        let config = AppConfig::new(&MockEnv::new(&[
            ("SUBCONV_API_BASE_URL", "https://api.example.com"),
            ("SUBCONV_APP_TITLE", "Nodes"),
            ("SUBCONV_BACKEND_PORT", "9000"),
            ("SUBCONV_REQUEST_TIMEOUT_MS", "5000"),
        ]));
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.page_title("登录"), "登录 - Nodes");
        assert_eq!(config.backend_port, 9000);
        assert_eq!(config.request_timeout_ms, 5000);
    }

    #[test]
    fn unparseable_numbers_fall_back() {
        let config = AppConfig::new(&MockEnv::new(&[
            ("SUBCONV_DEV_SERVER_PORT", "abc"),
            ("SUBCONV_BACKEND_PORT", "70000"),
        ]));
        assert_eq!(config.dev_server_port, 3000);
        assert_eq!(config.backend_port, 8001);
    }
}
