use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::{OrderDto, OrderItemDto, PageDto};

use crate::controller::Exhaust;
use crate::response::PageResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    id: Uuid,
    book_id: Uuid,
    book_title: String,
    book_author: String,
    quantity: i32,
    price: Decimal,
}

impl From<OrderItemDto> for OrderItemResponse {
    fn from(value: OrderItemDto) -> Self {
        Self {
            id: value.id,
            book_id: value.book_id,
            book_title: value.book_title,
            book_author: value.book_author,
            quantity: value.quantity,
            price: value.price,
        }
    }
}

impl IntoResponse for OrderItemResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    id: Uuid,
    user_id: Uuid,
    first_name: String,
    last_name: String,
    shipping_address: String,
    status: String,
    total: Decimal,
    #[serde(with = "time::serde::rfc3339")]
    order_date: OffsetDateTime,
    order_items: Vec<OrderItemResponse>,
}

impl From<OrderDto> for OrderResponse {
    fn from(value: OrderDto) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            first_name: value.first_name,
            last_name: value.last_name,
            shipping_address: value.shipping_address,
            status: value.status,
            total: value.total,
            order_date: value.order_date,
            order_items: value
                .items
                .into_iter()
                .map(OrderItemResponse::from)
                .collect(),
        }
    }
}

impl IntoResponse for OrderResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

pub struct OrderPresenter;

impl Exhaust<OrderDto> for OrderPresenter {
    type To = OrderResponse;
    fn emit(&self, input: OrderDto) -> Self::To {
        OrderResponse::from(input)
    }
}

impl Exhaust<OrderItemDto> for OrderPresenter {
    type To = OrderItemResponse;
    fn emit(&self, input: OrderItemDto) -> Self::To {
        OrderItemResponse::from(input)
    }
}

impl Exhaust<Vec<OrderItemDto>> for OrderPresenter {
    type To = axum::Json<Vec<OrderItemResponse>>;
    fn emit(&self, input: Vec<OrderItemDto>) -> Self::To {
        axum::Json(input.into_iter().map(OrderItemResponse::from).collect())
    }
}

impl Exhaust<PageDto<OrderDto>> for OrderPresenter {
    type To = axum::Json<PageResponse<OrderResponse>>;
    fn emit(&self, input: PageDto<OrderDto>) -> Self::To {
        axum::Json(PageResponse::from(input))
    }
}
