use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use application::transfer::{BookDto, PageDto};

use crate::controller::Exhaust;
use crate::response::PageResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    id: Uuid,
    title: String,
    author: String,
    isbn: String,
    price: Decimal,
    description: Option<String>,
    cover_image: Option<String>,
    category_ids: Vec<Uuid>,
}

impl From<BookDto> for BookResponse {
    fn from(value: BookDto) -> Self {
        Self {
            id: value.id,
            title: value.title,
            author: value.author,
            isbn: value.isbn,
            price: value.price,
            description: value.description,
            cover_image: value.cover_image,
            category_ids: value.category_ids,
        }
    }
}

impl IntoResponse for BookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

pub struct BookPresenter;

impl Exhaust<()> for BookPresenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}

impl Exhaust<BookDto> for BookPresenter {
    type To = BookResponse;
    fn emit(&self, input: BookDto) -> Self::To {
        BookResponse::from(input)
    }
}

impl Exhaust<PageDto<BookDto>> for BookPresenter {
    type To = axum::Json<PageResponse<BookResponse>>;
    fn emit(&self, input: PageDto<BookDto>) -> Self::To {
        axum::Json(PageResponse::from(input))
    }
}
