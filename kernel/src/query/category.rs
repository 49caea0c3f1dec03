use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Category, CategoryId, CategorySortKey, Page, Pagination};
use crate::KernelError;

#[async_trait::async_trait]
pub trait CategoryQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &CategoryId,
    ) -> error_stack::Result<Option<Category>, KernelError>;
    async fn find_page(
        &self,
        con: &mut Self::Transaction,
        pagination: &Pagination<CategorySortKey>,
    ) -> error_stack::Result<Page<Category>, KernelError>;
}

pub trait DependOnCategoryQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type CategoryQuery: CategoryQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn category_query(&self) -> &Self::CategoryQuery;
}
