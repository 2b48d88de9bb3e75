//! 订单模块
//!
//! | 子模块 | 说明 |
//! |--------|------|
//! | [`repository`] | 下单、查询、状态流转 |
//! | [`money`] | 金额计算与校验 (Decimal) |
//! | [`rows`] | 存储行结构 (snake_case) |
//! | [`error`] | [`OrderError`] |

pub mod error;
pub mod money;
pub mod repository;
pub mod rows;

pub use error::OrderError;
pub use repository::{DEFAULT_RECENT_LIMIT, MAX_RECENT_LIMIT, OrderRepository};
