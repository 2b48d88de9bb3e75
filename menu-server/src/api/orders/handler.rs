//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{CreateOrderRequest, Order, OrderStatusUpdate, OrderWithItems};
use uuid::Uuid;

use crate::core::ServerState;
use crate::orders::{DEFAULT_RECENT_LIMIT, OrderError};
use crate::utils::{ApiResponse, AppResult};

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

/// POST /api/orders - 下单
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let created = state.orders.create_order(&payload).await?;
    Ok(ApiResponse::success(created))
}

/// GET /api/orders - 最近订单
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<RecentQuery>,
) -> AppResult<ApiResponse<Vec<Order>>> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    let orders = state.orders.recent_orders(limit).await?;
    Ok(ApiResponse::success(orders))
}

/// GET /api/orders/:id - 订单详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = state
        .orders
        .get_order(id)
        .await?
        .ok_or(OrderError::NotFound(id))?;
    Ok(ApiResponse::success(order))
}

/// PATCH /api/orders/:id/status - 状态流转
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<ApiResponse<Order>> {
    let order = state.orders.update_status(id, payload.status).await?;
    Ok(ApiResponse::success(order))
}
