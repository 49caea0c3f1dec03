use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::ShoppingCart;
use crate::KernelError;

#[async_trait::async_trait]
pub trait ShoppingCartModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Fails with `KernelError::Conflict` when the user already owns a cart.
    async fn create(
        &self,
        con: &mut Self::Transaction,
        cart: &ShoppingCart,
    ) -> error_stack::Result<(), KernelError>;
    /// Writes the whole aggregate. The stored version must equal `cart.version()`,
    /// otherwise fails with `KernelError::Concurrency`; on success it is bumped.
    async fn update(
        &self,
        con: &mut Self::Transaction,
        cart: &ShoppingCart,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnShoppingCartModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type ShoppingCartModifier: ShoppingCartModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn shopping_cart_modifier(&self) -> &Self::ShoppingCartModifier;
}
