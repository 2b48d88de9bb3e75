//! Menu API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/menu?mode=business\|family | GET | 排版好的两页菜单 |
//! | /api/menu/dishes | GET / PUT | 菜品列表 / 整体替换 |
//! | /api/menu/dishes/{id} | PUT / DELETE | 保存 / 删除菜品 |
//! | /api/menu/categories | GET / PUT | 分类列表 / 整体替换 |
//! | /api/menu/categories/{id} | PUT / DELETE | 保存 / 删除分类 |

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::view))
        .route(
            "/dishes",
            get(handler::list_dishes).put(handler::replace_dishes),
        )
        .route(
            "/dishes/{id}",
            put(handler::save_dish).delete(handler::delete_dish),
        )
        .route(
            "/categories",
            get(handler::list_categories).put(handler::replace_categories),
        )
        .route(
            "/categories/{id}",
            put(handler::save_category).delete(handler::delete_category),
        )
}
