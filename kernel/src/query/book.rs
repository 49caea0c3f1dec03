use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Book, BookId, BookSortKey, CategoryId, Page, Pagination};
use crate::specification::BookFilter;
use crate::KernelError;

/// Every method sees active (not soft-deleted) books only.
#[async_trait::async_trait]
pub trait BookQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError>;
    async fn find_page(
        &self,
        con: &mut Self::Transaction,
        filter: &BookFilter,
        pagination: &Pagination<BookSortKey>,
    ) -> error_stack::Result<Page<Book>, KernelError>;
    async fn find_by_category_id(
        &self,
        con: &mut Self::Transaction,
        category_id: &CategoryId,
        pagination: &Pagination<BookSortKey>,
    ) -> error_stack::Result<Page<Book>, KernelError>;
}

pub trait DependOnBookQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type BookQuery: BookQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn book_query(&self) -> &Self::BookQuery;
}
