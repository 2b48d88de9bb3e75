use crate::waiter::WaiterConfig;

/// 订单存储配置
///
/// `STORE_BACKEND=memory` 使用进程内存储 (本地开发，重启即丢失)；
/// 默认 `rest`，需要同时设置 `STORE_URL` 和 `STORE_API_KEY`，
/// 否则下单接口返回 StoreUnavailable。
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// rest | memory
    pub backend: String,
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Self {
            backend: std::env::var("STORE_BACKEND").unwrap_or_else(|_| "rest".into()),
            url: non_empty_var("STORE_URL"),
            api_key: non_empty_var("STORE_API_KEY"),
            timeout_ms: std::env::var("STORE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10000),
        }
    }

    pub fn is_memory(&self) -> bool {
        self.backend.eq_ignore_ascii_case("memory")
    }

    /// URL and key, only when both are present
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.url.as_deref()?, self.api_key.as_deref()?))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | MENU_DIR | ./data/menu | 菜单 JSON 文件目录 |
/// | STORE_BACKEND | rest | 订单存储后端 (rest / memory) |
/// | STORE_URL | - | PostgREST 服务地址 |
/// | STORE_API_KEY | - | PostgREST API key |
/// | STORE_TIMEOUT_MS | 10000 | 存储请求超时(毫秒) |
/// | LOG_LEVEL | info | 日志级别 (RUST_LOG 优先) |
/// | LOG_DIR | - | 日志目录 (存在时按天滚动写文件) |
/// | LOG_JSON | false | JSON 格式日志 |
///
/// 智能服务员的配置见 [`WaiterConfig`]。
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 菜单文件目录
    pub menu_dir: String,
    pub store: StoreConfig,
    pub waiter: WaiterConfig,
    pub log_level: Option<String>,
    pub log_dir: Option<String>,
    pub log_json: bool,
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            menu_dir: std::env::var("MENU_DIR").unwrap_or_else(|_| "./data/menu".into()),
            store: StoreConfig::from_env(),
            waiter: WaiterConfig::from_env(),
            log_level: non_empty_var("LOG_LEVEL"),
            log_dir: non_empty_var("LOG_DIR"),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(menu_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.menu_dir = menu_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_credentials_need_both_parts() {
        let mut store = StoreConfig {
            backend: "rest".into(),
            url: Some("https://demo.supabase.co".into()),
            api_key: None,
            timeout_ms: 1000,
        };
        assert!(store.credentials().is_none());

        store.api_key = Some("anon".into());
        assert_eq!(
            store.credentials(),
            Some(("https://demo.supabase.co", "anon"))
        );
        assert!(!store.is_memory());

        store.backend = "Memory".into();
        assert!(store.is_memory());
    }
}
