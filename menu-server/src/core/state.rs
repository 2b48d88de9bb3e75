use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::Config;
use crate::menu::MenuBook;
use crate::orders::OrderRepository;
use crate::store::{MemoryStore, RestStore, TableStore};
use crate::waiter::WaiterSession;

/// 服务器状态 - 持有所有服务的共享引用
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | orders | OrderRepository | 订单仓储 (存储未配置时所有操作返回 StoreUnavailable) |
/// | menu | Arc<MenuBook> | 菜单 |
/// | waiter | Arc<WaiterSession> | 智能服务员会话 |
///
/// Clone 只复制 Arc。
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub orders: OrderRepository,
    pub menu: Arc<MenuBook>,
    pub waiter: Arc<WaiterSession>,
    started_at: Instant,
}

impl ServerState {
    /// 按配置创建所有服务
    pub async fn initialize(config: &Config) -> Self {
        let orders = OrderRepository::new(build_store(config));
        let menu = Arc::new(MenuBook::load(&config.menu_dir).await);
        let waiter = Arc::new(WaiterSession::new(config.waiter.clone(), menu.clone()));
        Self::new(config.clone(), orders, menu, waiter)
    }

    pub fn new(
        config: Config,
        orders: OrderRepository,
        menu: Arc<MenuBook>,
        waiter: Arc<WaiterSession>,
    ) -> Self {
        Self {
            config,
            orders,
            menu,
            waiter,
            started_at: Instant::now(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

fn build_store(config: &Config) -> Option<Arc<dyn TableStore>> {
    let store = &config.store;
    if store.is_memory() {
        tracing::warn!("Using in-memory order store, orders are lost on restart");
        return Some(Arc::new(MemoryStore::new()));
    }

    let Some((url, api_key)) = store.credentials() else {
        tracing::warn!("STORE_URL / STORE_API_KEY not set, ordering is disabled");
        return None;
    };
    match RestStore::new(url, api_key, Duration::from_millis(store.timeout_ms)) {
        Ok(rest) => {
            tracing::info!(url = %rest.base_url(), "Order store configured");
            Some(Arc::new(rest))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create order store client");
            None
        }
    }
}
