mod description;
mod id;
mod name;

pub use self::{description::*, id::*, name::*};
use crate::entity::{IsDeleted, SortKey};
use destructure::{Destructure, Mutation};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Category {
    id: CategoryId,
    name: CategoryName,
    description: CategoryDescription,
    is_deleted: IsDeleted<Category>,
}

impl Category {
    pub fn new(
        id: CategoryId,
        name: CategoryName,
        description: CategoryDescription,
        is_deleted: IsDeleted<Category>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            is_deleted,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CategorySortKey {
    #[default]
    Name,
}

impl SortKey for CategorySortKey {
    fn parse(key: &str) -> Option<Self> {
        match key {
            "name" => Some(CategorySortKey::Name),
            _ => None,
        }
    }
}
