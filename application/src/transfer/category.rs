use uuid::Uuid;

use kernel::prelude::entity::{Category, DestructCategory};
use kernel::KernelError;

use crate::transfer::PageRequestDto;
use crate::validation::Validator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

impl From<Category> for CategoryDto {
    fn from(value: Category) -> Self {
        let DestructCategory {
            id,
            name,
            description,
            ..
        } = value.into_destruct();
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

pub struct GetCategoryDto {
    pub id: Uuid,
}

pub struct GetAllCategoryDto {
    pub page: PageRequestDto,
}

#[derive(Debug, Clone)]
pub struct CreateCategoryDto {
    pub name: String,
    pub description: String,
}

impl CreateCategoryDto {
    pub fn validate(&self) -> error_stack::Result<(), KernelError> {
        Validator::new()
            .not_blank("name", &self.name, "Category name is required")
            .not_blank(
                "description",
                &self.description,
                "Category description is required",
            )
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryDto {
    pub id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateCategoryDto {
    pub fn validate(&self) -> error_stack::Result<(), KernelError> {
        let mut validator = Validator::new();
        if let Some(name) = &self.name {
            validator.not_blank("name", name, "Category name must not be blank");
        }
        if let Some(description) = &self.description {
            validator.not_blank(
                "description",
                description,
                "Category description must not be blank",
            );
        }
        validator.finish()
    }
}

pub struct DeleteCategoryDto {
    pub id: Uuid,
}
