//! Order errors

use crate::store::StoreError;
use shared::error::{AppError, ErrorCode};
use shared::models::OrderStatus;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order store is not configured")]
    StoreUnavailable,

    #[error("Order has no items")]
    EmptyOrder,

    #[error("Invalid order item: {0}")]
    InvalidItem(String),

    #[error("Failed to generate order number: {0}")]
    SequenceGenerationFailed(#[source] StoreError),

    #[error("Failed to create order: {0}")]
    OrderInsertFailed(#[source] StoreError),

    #[error("Failed to create order items: {0}")]
    ItemInsertFailed(#[source] StoreError),

    #[error("Order query failed: {0}")]
    Query(#[source] StoreError),

    #[error("Order {0} not found")]
    NotFound(Uuid),

    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
}

impl OrderError {
    pub fn code(&self) -> ErrorCode {
        match self {
            OrderError::StoreUnavailable => ErrorCode::StoreUnavailable,
            OrderError::EmptyOrder => ErrorCode::OrderEmpty,
            OrderError::InvalidItem(_) => ErrorCode::OrderInvalidItem,
            OrderError::SequenceGenerationFailed(_) => ErrorCode::OrderNumberFailed,
            OrderError::OrderInsertFailed(_) => ErrorCode::OrderCreateFailed,
            OrderError::ItemInsertFailed(_) => ErrorCode::OrderItemsCreateFailed,
            OrderError::Query(e) if e.is_transport() => ErrorCode::NetworkError,
            OrderError::Query(_) => ErrorCode::DatabaseError,
            OrderError::NotFound(_) => ErrorCode::OrderNotFound,
            OrderError::InvalidTransition { .. } => ErrorCode::OrderInvalidTransition,
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let code = err.code();
        let app = AppError::with_message(code, err.to_string());
        match err {
            OrderError::NotFound(id) => app.with_detail("orderId", id.to_string()),
            OrderError::InvalidTransition { from, to } => app
                .with_detail("from", from.as_str())
                .with_detail("to", to.as_str()),
            _ => app,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_error_maps_to_http_status() {
        let cases = [
            (OrderError::StoreUnavailable, StatusCode::SERVICE_UNAVAILABLE),
            (OrderError::EmptyOrder, StatusCode::BAD_REQUEST),
            (OrderError::InvalidItem("qty".into()), StatusCode::BAD_REQUEST),
            (OrderError::NotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (
                OrderError::SequenceGenerationFailed(StoreError::Injected("rpc".into())),
                StatusCode::BAD_GATEWAY,
            ),
            (
                OrderError::InvalidTransition {
                    from: OrderStatus::Completed,
                    to: OrderStatus::Pending,
                },
                StatusCode::CONFLICT,
            ),
        ];
        for (err, status) in cases {
            let app: AppError = err.into();
            assert_eq!(app.http_status(), status, "{}", app.message);
        }
    }

    #[test]
    fn test_transition_details() {
        let app: AppError = OrderError::InvalidTransition {
            from: OrderStatus::Cancelled,
            to: OrderStatus::Confirmed,
        }
        .into();
        assert_eq!(app.code, ErrorCode::OrderInvalidTransition);
        let details = app.details.unwrap();
        assert_eq!(details["from"], "cancelled");
        assert_eq!(details["to"], "confirmed");
    }
}
