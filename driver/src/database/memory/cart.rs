use kernel::interface::query::ShoppingCartQuery;
use kernel::interface::update::ShoppingCartModifier;
use kernel::prelude::entity::{
    BookId, CartItem, CartItemId, CartItemQuantity, ShoppingCart, UserId, Version,
};
use kernel::KernelError;

use crate::database::memory::{InMemoryTransaction, StoredCart};

pub struct InMemoryShoppingCartRepository;

#[async_trait::async_trait]
impl ShoppingCartQuery for InMemoryShoppingCartRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_user_id(
        &self,
        con: &mut InMemoryTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Option<ShoppingCart>, KernelError> {
        let store = con.store();
        let Some(stored) = store.carts.values().find(|cart| &cart.user_id == user_id) else {
            return Ok(None);
        };
        // lines of deleted books drop out of the cart
        let items = stored
            .lines
            .iter()
            .filter_map(|(item_id, book_id, quantity)| {
                store
                    .active_book(book_id)
                    .map(|book| CartItem::new(*item_id, book.clone(), *quantity))
            })
            .collect::<Vec<_>>();
        Ok(Some(ShoppingCart::new(
            stored.id,
            stored.user_id,
            Version::new(stored.version),
            items,
        )))
    }
}

#[async_trait::async_trait]
impl ShoppingCartModifier for InMemoryShoppingCartRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        cart: &ShoppingCart,
    ) -> error_stack::Result<(), KernelError> {
        let store = con.store();
        if store.carts.values().any(|other| &other.user_id == cart.user_id()) {
            return Err(KernelError::Conflict.with_message(format!(
                "User {} already has a shopping cart",
                cart.user_id().as_ref()
            )));
        }
        store.carts.insert(
            *cart.id(),
            StoredCart {
                id: *cart.id(),
                user_id: *cart.user_id(),
                version: *cart.version().as_ref(),
                lines: lines(cart),
            },
        );
        Ok(())
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        cart: &ShoppingCart,
    ) -> error_stack::Result<(), KernelError> {
        let Some(stored) = con.store().carts.get_mut(cart.id()) else {
            return Err(KernelError::NotFound.with_message(format!(
                "Can't find shopping cart by id: {}",
                cart.id().as_ref()
            )));
        };
        if &stored.version != cart.version().as_ref() {
            return Err(KernelError::Concurrency.with_message(format!(
                "Shopping cart {} was modified concurrently",
                cart.id().as_ref()
            )));
        }
        stored.version += 1;
        stored.lines = lines(cart);
        Ok(())
    }
}

fn lines(cart: &ShoppingCart) -> Vec<(CartItemId, BookId, CartItemQuantity)> {
    cart.items()
        .iter()
        .map(|item| (*item.id(), *item.book().id(), *item.quantity()))
        .collect()
}
