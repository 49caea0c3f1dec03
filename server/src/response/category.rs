use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

use application::transfer::{BookDto, CategoryDto, PageDto};

use crate::controller::Exhaust;
use crate::response::{BookResponse, PageResponse};

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    id: Uuid,
    name: String,
    description: String,
}

impl From<CategoryDto> for CategoryResponse {
    fn from(value: CategoryDto) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
        }
    }
}

impl IntoResponse for CategoryResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

pub struct CategoryPresenter;

impl Exhaust<()> for CategoryPresenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}

impl Exhaust<CategoryDto> for CategoryPresenter {
    type To = CategoryResponse;
    fn emit(&self, input: CategoryDto) -> Self::To {
        CategoryResponse::from(input)
    }
}

impl Exhaust<PageDto<CategoryDto>> for CategoryPresenter {
    type To = axum::Json<PageResponse<CategoryResponse>>;
    fn emit(&self, input: PageDto<CategoryDto>) -> Self::To {
        axum::Json(PageResponse::from(input))
    }
}

impl Exhaust<PageDto<BookDto>> for CategoryPresenter {
    type To = axum::Json<PageResponse<BookResponse>>;
    fn emit(&self, input: PageDto<BookDto>) -> Self::To {
        axum::Json(PageResponse::from(input))
    }
}
