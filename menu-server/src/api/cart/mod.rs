//! Cart API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/cart/quote | POST | 按当前菜单计算购物车金额 |
//! | /api/cart/checkout | POST | 按当前菜单价格下单 |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/cart/quote", post(handler::quote))
        .route("/api/cart/checkout", post(handler::checkout))
}
