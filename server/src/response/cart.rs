use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use application::transfer::{CartItemDto, ShoppingCartDto};

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    id: Uuid,
    book_id: Uuid,
    book_title: String,
    price: Decimal,
    quantity: i32,
}

impl From<CartItemDto> for CartItemResponse {
    fn from(value: CartItemDto) -> Self {
        Self {
            id: value.id,
            book_id: value.book_id,
            book_title: value.book_title,
            price: value.price,
            quantity: value.quantity,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingCartResponse {
    id: Uuid,
    user_id: Uuid,
    cart_items: Vec<CartItemResponse>,
}

impl IntoResponse for ShoppingCartResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

pub struct CartPresenter;

impl Exhaust<ShoppingCartDto> for CartPresenter {
    type To = ShoppingCartResponse;
    fn emit(&self, input: ShoppingCartDto) -> Self::To {
        ShoppingCartResponse {
            id: input.id,
            user_id: input.user_id,
            cart_items: input
                .items
                .into_iter()
                .map(CartItemResponse::from)
                .collect(),
        }
    }
}
