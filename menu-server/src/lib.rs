//! Menu Server - 私房菜菜单与点餐服务
//!
//! # 架构概述
//!
//! - **订单** (`orders`): 通过远程表存储下单、查询、状态流转
//! - **存储** (`store`): PostgREST 客户端与进程内存储
//! - **菜单** (`menu`): 菜品/分类 JSON 持久化与打印排版
//! - **服务员** (`waiter`): 基于 Gemini 的点餐助手
//! - **HTTP API** (`api`): RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! menu-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── orders/        # 订单仓储、金额计算
//! ├── store/         # 表存储 (REST / 内存)
//! ├── menu/          # 菜单存储与排版
//! ├── waiter/        # 智能服务员
//! └── utils/         # 日志、错误类型
//! ```

pub mod api;
pub mod core;
pub mod menu;
pub mod orders;
pub mod store;
pub mod utils;
pub mod waiter;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use menu::MenuBook;
pub use orders::{OrderError, OrderRepository};
pub use store::{MemoryStore, RestStore, TableStore};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use waiter::WaiterSession;

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Initialize logging from the configuration
pub fn setup_environment(config: &Config) {
    init_logger_with_file(
        config.log_level.as_deref(),
        config.log_json,
        config.log_dir.as_deref(),
    );
}

pub fn print_banner() {
    println!(
        r#"
   _____ ______________
  / ___// ____/ ____/
  \__ \/ / __/ / __
 ___/ / /_/ / /_/ /
/____/\____/\____/   私房菜 · Menu Server
    "#
    );
}
