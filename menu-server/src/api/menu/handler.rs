//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{CategoryConfig, Dish};

use crate::core::ServerState;
use crate::menu::{MenuView, ViewMode, build_view};
use crate::utils::{ApiResponse, AppResult};

#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub mode: ViewMode,
}

/// GET /api/menu - 排版好的菜单
pub async fn view(
    State(state): State<ServerState>,
    Query(query): Query<ViewQuery>,
) -> AppResult<ApiResponse<MenuView>> {
    let menu = state.menu.snapshot().await;
    Ok(ApiResponse::success(build_view(
        &menu.dishes,
        &menu.categories,
        query.mode,
    )))
}

/// GET /api/menu/dishes
pub async fn list_dishes(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<Dish>>> {
    Ok(ApiResponse::success(state.menu.dishes().await))
}

/// PUT /api/menu/dishes - 整体替换
pub async fn replace_dishes(
    State(state): State<ServerState>,
    Json(dishes): Json<Vec<Dish>>,
) -> AppResult<ApiResponse<Vec<Dish>>> {
    let dishes = state.menu.replace_dishes(dishes).await?;
    Ok(ApiResponse::success(dishes))
}

/// PUT /api/menu/dishes/:id - 新增或更新
pub async fn save_dish(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(mut dish): Json<Dish>,
) -> AppResult<ApiResponse<Dish>> {
    dish.id = id;
    let dish = state.menu.upsert_dish(dish).await?;
    Ok(ApiResponse::success(dish))
}

/// DELETE /api/menu/dishes/:id
pub async fn delete_dish(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Dish>> {
    let removed = state.menu.remove_dish(&id).await?;
    Ok(ApiResponse::success(removed))
}

/// GET /api/menu/categories
pub async fn list_categories(
    State(state): State<ServerState>,
) -> AppResult<ApiResponse<Vec<CategoryConfig>>> {
    Ok(ApiResponse::success(state.menu.categories().await))
}

/// PUT /api/menu/categories - 整体替换 (顺序即排版顺序)
pub async fn replace_categories(
    State(state): State<ServerState>,
    Json(categories): Json<Vec<CategoryConfig>>,
) -> AppResult<ApiResponse<Vec<CategoryConfig>>> {
    let categories = state.menu.replace_categories(categories).await?;
    Ok(ApiResponse::success(categories))
}

/// PUT /api/menu/categories/:id - 新增或更新 (改名会同步菜品分类)
pub async fn save_category(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(mut category): Json<CategoryConfig>,
) -> AppResult<ApiResponse<CategoryConfig>> {
    category.id = id;
    let category = state.menu.upsert_category(category).await?;
    Ok(ApiResponse::success(category))
}

/// DELETE /api/menu/categories/:id
pub async fn delete_category(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<CategoryConfig>> {
    let removed = state.menu.remove_category(&id).await?;
    Ok(ApiResponse::success(removed))
}
