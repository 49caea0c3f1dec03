use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{ShoppingCart, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait ShoppingCartQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Loads the cart together with its lines and each line's book.
    async fn find_by_user_id(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<Option<ShoppingCart>, KernelError>;
}

pub trait DependOnShoppingCartQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type ShoppingCartQuery: ShoppingCartQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn shopping_cart_query(&self) -> &Self::ShoppingCartQuery;
}
