//! Waiter API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/waiter/messages | POST | 发送一句话，返回小二的回复 |
//! | /api/waiter/messages | GET | 当前会话记录 |
//! | /api/waiter/messages | DELETE | 重置会话 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/waiter/messages",
        get(handler::history)
            .post(handler::send)
            .delete(handler::reset),
    )
}
