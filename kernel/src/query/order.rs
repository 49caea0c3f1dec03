use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Order, OrderId, OrderSortKey, Page, Pagination, UserId};
use crate::KernelError;

/// Orders are always returned with their items.
#[async_trait::async_trait]
pub trait OrderQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &OrderId,
    ) -> error_stack::Result<Option<Order>, KernelError>;
    async fn find_by_id_and_user_id(
        &self,
        con: &mut Self::Transaction,
        id: &OrderId,
        user_id: &UserId,
    ) -> error_stack::Result<Option<Order>, KernelError>;
    async fn find_page_by_user_id(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
        pagination: &Pagination<OrderSortKey>,
    ) -> error_stack::Result<Page<Order>, KernelError>;
}

pub trait DependOnOrderQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type OrderQuery: OrderQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn order_query(&self) -> &Self::OrderQuery;
}
