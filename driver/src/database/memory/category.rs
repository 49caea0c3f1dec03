use std::cmp::Ordering;

use kernel::interface::query::CategoryQuery;
use kernel::interface::update::CategoryModifier;
use kernel::prelude::entity::{
    Category, CategoryId, CategorySortKey, IsDeleted, Page, Pagination, SortDirection,
};
use kernel::KernelError;

use crate::database::memory::InMemoryTransaction;

pub struct InMemoryCategoryRepository;

#[async_trait::async_trait]
impl CategoryQuery for InMemoryCategoryRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &CategoryId,
    ) -> error_stack::Result<Option<Category>, KernelError> {
        Ok(con
            .store()
            .categories
            .get(id)
            .filter(|category| !category.is_deleted().as_ref())
            .cloned())
    }

    async fn find_page(
        &self,
        con: &mut InMemoryTransaction,
        pagination: &Pagination<CategorySortKey>,
    ) -> error_stack::Result<Page<Category>, KernelError> {
        let sort = pagination.sort();
        let mut categories = con
            .store()
            .categories
            .values()
            .filter(|category| !category.is_deleted().as_ref())
            .cloned()
            .collect::<Vec<_>>();
        categories.sort_by(|a, b| {
            let ordering = match sort.key() {
                CategorySortKey::Name => a.name().as_ref().cmp(b.name().as_ref()),
            }
            .then_with(|| a.id().cmp(b.id()));
            match sort.direction() {
                SortDirection::Asc => ordering,
                SortDirection::Desc => Ordering::reverse(ordering),
            }
        });
        let total = i64::try_from(categories.len()).unwrap_or(i64::MAX);
        Ok(Page::new(
            pagination.window(categories),
            total,
            pagination.limit(),
            pagination.offset(),
        ))
    }
}

#[async_trait::async_trait]
impl CategoryModifier for InMemoryCategoryRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        category: &Category,
    ) -> error_stack::Result<(), KernelError> {
        con.store()
            .categories
            .insert(*category.id(), category.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        category: &Category,
    ) -> error_stack::Result<(), KernelError> {
        if let Some(stored) = con.store().categories.get_mut(category.id()) {
            if !stored.is_deleted().as_ref() {
                *stored = category.clone();
            }
        }
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut InMemoryTransaction,
        category_id: &CategoryId,
    ) -> error_stack::Result<(), KernelError> {
        if let Some(category) = con.store().categories.get_mut(category_id) {
            category.substitute(|category| *category.is_deleted = IsDeleted::new(true));
        }
        Ok(())
    }
}
