use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use application::transfer::{
    CreateBookDto, DeleteBookDto, GetAllBookDto, GetBookDto, SearchBookDto, UpdateBookDto,
};

use crate::controller::Intake;
use crate::request::PageQuery;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    title: String,
    author: String,
    isbn: String,
    price: Decimal,
    description: Option<String>,
    cover_image: Option<String>,
    #[serde(default)]
    category_ids: Vec<Uuid>,
}

/// Absent fields keep their stored value.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    title: Option<String>,
    author: Option<String>,
    isbn: Option<String>,
    price: Option<Decimal>,
    description: Option<String>,
    cover_image: Option<String>,
    category_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBookQuery {
    title_part: Option<String>,
    author: Option<String>,
    isbn: Option<String>,
    description_part: Option<String>,
    limit: Option<i32>,
    offset: Option<i32>,
    sort: Option<String>,
}

#[derive(Debug)]
pub struct GetBookRequest {
    id: Uuid,
}

impl GetBookRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct DeleteBookRequest {
    id: Uuid,
}

impl DeleteBookRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

pub struct BookTransformer;

impl Intake<PageQuery> for BookTransformer {
    type To = GetAllBookDto;
    fn emit(&self, input: PageQuery) -> Self::To {
        GetAllBookDto { page: input.into() }
    }
}

impl Intake<SearchBookQuery> for BookTransformer {
    type To = SearchBookDto;
    fn emit(&self, input: SearchBookQuery) -> Self::To {
        SearchBookDto {
            title_part: input.title_part,
            author: input.author,
            isbn: input.isbn,
            description_part: input.description_part,
            page: PageQuery::new(input.limit, input.offset, input.sort).into(),
        }
    }
}

impl Intake<GetBookRequest> for BookTransformer {
    type To = GetBookDto;
    fn emit(&self, input: GetBookRequest) -> Self::To {
        GetBookDto { id: input.id }
    }
}

impl Intake<CreateBookRequest> for BookTransformer {
    type To = CreateBookDto;
    fn emit(&self, input: CreateBookRequest) -> Self::To {
        CreateBookDto {
            title: input.title,
            author: input.author,
            isbn: input.isbn,
            price: input.price,
            description: input.description,
            cover_image: input.cover_image,
            category_ids: input.category_ids,
        }
    }
}

impl Intake<(Uuid, UpdateBookRequest)> for BookTransformer {
    type To = UpdateBookDto;
    fn emit(&self, input: (Uuid, UpdateBookRequest)) -> Self::To {
        let (id, input) = input;
        UpdateBookDto {
            id,
            title: input.title,
            author: input.author,
            isbn: input.isbn,
            price: input.price,
            description: input.description,
            cover_image: input.cover_image,
            category_ids: input.category_ids,
        }
    }
}

impl Intake<DeleteBookRequest> for BookTransformer {
    type To = DeleteBookDto;
    fn emit(&self, input: DeleteBookRequest) -> Self::To {
        DeleteBookDto { id: input.id }
    }
}
