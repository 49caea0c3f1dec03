use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnBookQuery, DependOnCategoryQuery, DependOnOrderQuery, DependOnShoppingCartQuery,
    DependOnUserQuery,
};
use kernel::interface::security::DependOnPasswordHasher;
use kernel::interface::specification::{
    BookSpecificationRegistry, DependOnBookSpecificationRegistry,
};
use kernel::interface::update::{
    DependOnBookModifier, DependOnCategoryModifier, DependOnOrderModifier,
    DependOnShoppingCartModifier, DependOnUserModifier,
};
use kernel::prelude::entity::{
    Book, BookId, CartItemId, CartItemQuantity, Category, CategoryId, Order, OrderId,
    ShoppingCartId, User, UserId,
};
use kernel::KernelError;

use crate::security::Argon2PasswordHasher;

pub use self::{book::*, cart::*, category::*, order::*, user::*};

mod book;
mod cart;
mod category;
mod order;
mod user;

/// Cart row as a relational store would keep it: lines point at books by id, so
/// a cart always shows current book data.
#[derive(Debug, Clone)]
pub(in crate::database) struct StoredCart {
    id: ShoppingCartId,
    user_id: UserId,
    version: i64,
    lines: Vec<(CartItemId, BookId, CartItemQuantity)>,
}

#[derive(Debug, Clone, Default)]
pub(in crate::database) struct Store {
    books: BTreeMap<BookId, Book>,
    categories: BTreeMap<CategoryId, Category>,
    users: HashMap<UserId, User>,
    carts: HashMap<ShoppingCartId, StoredCart>,
    orders: HashMap<OrderId, Order>,
}

/// Process-local store. One transaction at a time holds the lock and works on a
/// copy that replaces the shared state on commit.
#[derive(Clone)]
pub struct InMemoryDatabase {
    store: Arc<Mutex<Store>>,
    registry: Arc<BookSpecificationRegistry>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self {
            store: Arc::new(Mutex::new(Store::default())),
            registry: Arc::new(BookSpecificationRegistry::default()),
        }
    }
}

impl Default for InMemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for InMemoryDatabase {
    type Transaction = InMemoryTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let guard = Arc::clone(&self.store).lock_owned().await;
        let working = Store::clone(&guard);
        Ok(InMemoryTransaction { guard, working })
    }
}

pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<Store>,
    working: Store,
}

impl InMemoryTransaction {
    pub(in crate::database) fn store(&mut self) -> &mut Store {
        &mut self.working
    }
}

#[async_trait::async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        let InMemoryTransaction { mut guard, working } = self;
        *guard = working;
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

impl DependOnBookQuery for InMemoryDatabase {
    type BookQuery = InMemoryBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &InMemoryBookRepository
    }
}

impl DependOnBookModifier for InMemoryDatabase {
    type BookModifier = InMemoryBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &InMemoryBookRepository
    }
}

impl DependOnCategoryQuery for InMemoryDatabase {
    type CategoryQuery = InMemoryCategoryRepository;
    fn category_query(&self) -> &Self::CategoryQuery {
        &InMemoryCategoryRepository
    }
}

impl DependOnCategoryModifier for InMemoryDatabase {
    type CategoryModifier = InMemoryCategoryRepository;
    fn category_modifier(&self) -> &Self::CategoryModifier {
        &InMemoryCategoryRepository
    }
}

impl DependOnUserQuery for InMemoryDatabase {
    type UserQuery = InMemoryUserRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &InMemoryUserRepository
    }
}

impl DependOnUserModifier for InMemoryDatabase {
    type UserModifier = InMemoryUserRepository;
    fn user_modifier(&self) -> &Self::UserModifier {
        &InMemoryUserRepository
    }
}

impl DependOnShoppingCartQuery for InMemoryDatabase {
    type ShoppingCartQuery = InMemoryShoppingCartRepository;
    fn shopping_cart_query(&self) -> &Self::ShoppingCartQuery {
        &InMemoryShoppingCartRepository
    }
}

impl DependOnShoppingCartModifier for InMemoryDatabase {
    type ShoppingCartModifier = InMemoryShoppingCartRepository;
    fn shopping_cart_modifier(&self) -> &Self::ShoppingCartModifier {
        &InMemoryShoppingCartRepository
    }
}

impl DependOnOrderQuery for InMemoryDatabase {
    type OrderQuery = InMemoryOrderRepository;
    fn order_query(&self) -> &Self::OrderQuery {
        &InMemoryOrderRepository
    }
}

impl DependOnOrderModifier for InMemoryDatabase {
    type OrderModifier = InMemoryOrderRepository;
    fn order_modifier(&self) -> &Self::OrderModifier {
        &InMemoryOrderRepository
    }
}

impl DependOnBookSpecificationRegistry for InMemoryDatabase {
    fn book_specification_registry(&self) -> &BookSpecificationRegistry {
        &self.registry
    }
}

impl DependOnPasswordHasher for InMemoryDatabase {
    type PasswordHasher = Argon2PasswordHasher;
    fn password_hasher(&self) -> &Self::PasswordHasher {
        &Argon2PasswordHasher
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use rust_decimal::Decimal;
    use uuid::Uuid;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::BookQuery;
    use kernel::interface::update::BookModifier;
    use kernel::prelude::entity::{
        Book, BookAuthor, BookId, BookPrice, BookTitle, IsDeleted, Isbn,
    };

    use crate::database::{InMemoryBookRepository, InMemoryDatabase};

    fn book() -> Book {
        Book::new(
            BookId::new(Uuid::new_v4()),
            BookTitle::new("Dune"),
            BookAuthor::new("Frank Herbert"),
            Isbn::new("9780441172719"),
            BookPrice::new(Decimal::new(999, 2)),
            None,
            None,
            BTreeSet::new(),
            IsDeleted::active(),
        )
    }

    #[tokio::test]
    async fn commit_publishes_and_drop_discards() {
        let db = InMemoryDatabase::new();
        let committed = book();
        let mut con = db.transact().await.unwrap();
        InMemoryBookRepository.create(&mut con, &committed).await.unwrap();
        con.commit().await.unwrap();

        let discarded = Book::new(
            BookId::new(Uuid::new_v4()),
            BookTitle::new("Emma"),
            BookAuthor::new("Jane Austen"),
            Isbn::new("9780141439587"),
            BookPrice::new(Decimal::new(500, 2)),
            None,
            None,
            BTreeSet::new(),
            IsDeleted::active(),
        );
        {
            let mut con = db.transact().await.unwrap();
            InMemoryBookRepository.create(&mut con, &discarded).await.unwrap();
        }
        let mut con = db.transact().await.unwrap();
        InMemoryBookRepository
            .create(&mut con, &discarded)
            .await
            .unwrap();
        con.roll_back().await.unwrap();

        let mut con = db.transact().await.unwrap();
        let found = InMemoryBookRepository
            .find_by_id(&mut con, committed.id())
            .await
            .unwrap();
        assert_eq!(found, Some(committed));
        let found = InMemoryBookRepository
            .find_by_id(&mut con, discarded.id())
            .await
            .unwrap();
        assert!(found.is_none());
    }
}
