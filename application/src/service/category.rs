use tracing::info;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{CategoryQuery, DependOnCategoryQuery};
use kernel::interface::update::{CategoryModifier, DependOnCategoryModifier};
use kernel::prelude::entity::{
    Category, CategoryDescription, CategoryId, CategoryName, IsDeleted,
};
use kernel::KernelError;

use crate::transfer::{
    CategoryDto, CreateCategoryDto, DeleteCategoryDto, GetAllCategoryDto, GetCategoryDto, PageDto,
    UpdateCategoryDto,
};

fn category_not_found(id: &Uuid) -> error_stack::Report<KernelError> {
    KernelError::NotFound.with_message(format!("Can't find category by id: {id}"))
}

#[async_trait::async_trait]
pub trait GetCategoryService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnCategoryQuery
{
    async fn get_category(
        &self,
        dto: GetCategoryDto,
    ) -> error_stack::Result<CategoryDto, KernelError> {
        let mut con = self.database_connection().transact().await?;
        let category = self
            .category_query()
            .find_by_id(&mut con, &CategoryId::new(dto.id))
            .await?
            .ok_or_else(|| category_not_found(&dto.id))?;
        Ok(CategoryDto::from(category))
    }

    async fn get_all_categories(
        &self,
        dto: GetAllCategoryDto,
    ) -> error_stack::Result<PageDto<CategoryDto>, KernelError> {
        let pagination = dto.page.into_pagination()?;
        let mut con = self.database_connection().transact().await?;
        let page = self.category_query().find_page(&mut con, &pagination).await?;
        Ok(PageDto::from(page))
    }
}

impl<T> GetCategoryService for T where T: DependOnCategoryQuery {}

#[async_trait::async_trait]
pub trait CreateCategoryService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnCategoryModifier
{
    async fn create_category(
        &self,
        dto: CreateCategoryDto,
    ) -> error_stack::Result<CategoryDto, KernelError> {
        dto.validate()?;
        let mut con = self.database_connection().transact().await?;

        let category = Category::new(
            CategoryId::new(Uuid::new_v4()),
            CategoryName::new(dto.name),
            CategoryDescription::new(dto.description),
            IsDeleted::active(),
        );
        self.category_modifier().create(&mut con, &category).await?;
        con.commit().await?;

        info!("Created category: {}", category.id().as_ref());
        Ok(CategoryDto::from(category))
    }
}

impl<T> CreateCategoryService for T where T: DependOnCategoryModifier {}

#[async_trait::async_trait]
pub trait UpdateCategoryService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnCategoryQuery
    + DependOnCategoryModifier
{
    async fn update_category(
        &self,
        dto: UpdateCategoryDto,
    ) -> error_stack::Result<CategoryDto, KernelError> {
        dto.validate()?;
        let mut con = self.database_connection().transact().await?;

        let mut category = self
            .category_query()
            .find_by_id(&mut con, &CategoryId::new(dto.id))
            .await?
            .ok_or_else(|| category_not_found(&dto.id))?;
        category.substitute(|category| {
            if let Some(name) = dto.name {
                *category.name = CategoryName::new(name);
            }
            if let Some(description) = dto.description {
                *category.description = CategoryDescription::new(description);
            }
        });
        self.category_modifier().update(&mut con, &category).await?;
        con.commit().await?;

        info!("Updated category: {}", dto.id);
        Ok(CategoryDto::from(category))
    }
}

impl<T> UpdateCategoryService for T where T: DependOnCategoryQuery + DependOnCategoryModifier {}

#[async_trait::async_trait]
pub trait DeleteCategoryService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnCategoryQuery
    + DependOnCategoryModifier
{
    async fn delete_category(&self, dto: DeleteCategoryDto) -> error_stack::Result<(), KernelError> {
        let mut con = self.database_connection().transact().await?;

        let id = CategoryId::new(dto.id);
        if self.category_query().find_by_id(&mut con, &id).await?.is_none() {
            return Err(category_not_found(&dto.id));
        }
        self.category_modifier().delete(&mut con, &id).await?;
        con.commit().await?;

        info!("Deleted category: {}", dto.id);
        Ok(())
    }
}

impl<T> DeleteCategoryService for T where T: DependOnCategoryQuery + DependOnCategoryModifier {}
