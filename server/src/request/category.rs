use serde::Deserialize;
use uuid::Uuid;

use application::transfer::{
    CreateCategoryDto, DeleteCategoryDto, GetAllCategoryDto, GetBooksByCategoryDto,
    GetCategoryDto, UpdateCategoryDto,
};

use crate::controller::Intake;
use crate::request::PageQuery;

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    name: Option<String>,
    description: Option<String>,
}

#[derive(Debug)]
pub struct GetCategoryRequest {
    id: Uuid,
}

impl GetCategoryRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct DeleteCategoryRequest {
    id: Uuid,
}

impl DeleteCategoryRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

pub struct CategoryTransformer;

impl Intake<PageQuery> for CategoryTransformer {
    type To = GetAllCategoryDto;
    fn emit(&self, input: PageQuery) -> Self::To {
        GetAllCategoryDto { page: input.into() }
    }
}

impl Intake<GetCategoryRequest> for CategoryTransformer {
    type To = GetCategoryDto;
    fn emit(&self, input: GetCategoryRequest) -> Self::To {
        GetCategoryDto { id: input.id }
    }
}

impl Intake<(Uuid, PageQuery)> for CategoryTransformer {
    type To = GetBooksByCategoryDto;
    fn emit(&self, input: (Uuid, PageQuery)) -> Self::To {
        let (category_id, page) = input;
        GetBooksByCategoryDto {
            category_id,
            page: page.into(),
        }
    }
}

impl Intake<CreateCategoryRequest> for CategoryTransformer {
    type To = CreateCategoryDto;
    fn emit(&self, input: CreateCategoryRequest) -> Self::To {
        CreateCategoryDto {
            name: input.name,
            description: input.description,
        }
    }
}

impl Intake<(Uuid, UpdateCategoryRequest)> for CategoryTransformer {
    type To = UpdateCategoryDto;
    fn emit(&self, input: (Uuid, UpdateCategoryRequest)) -> Self::To {
        let (id, input) = input;
        UpdateCategoryDto {
            id,
            name: input.name,
            description: input.description,
        }
    }
}

impl Intake<DeleteCategoryRequest> for CategoryTransformer {
    type To = DeleteCategoryDto;
    fn emit(&self, input: DeleteCategoryRequest) -> Self::To {
        DeleteCategoryDto { id: input.id }
    }
}
