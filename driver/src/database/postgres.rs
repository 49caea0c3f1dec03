use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use error_stack::Report;
use sqlx::{Error, PgConnection, Pool, Postgres};

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
use kernel::KernelError;

use crate::env;
use crate::error::ConvertError;
use crate::security::Argon2PasswordHasher;

pub use self::{book::*, cart::*, category::*, order::*, user::*};

mod book;
mod cart;
mod category;
mod order;
mod user;

static POSTGRES_URL: &str = "POSTGRES_URL";

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
    registry: Arc<BookSpecificationRegistry>,
}

impl PostgresDatabase {
    /// Connects to `POSTGRES_URL` and applies pending migrations.
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(POSTGRES_URL)?;
        let pool = Pool::<Postgres>::connect(&url).await.convert_error()?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|error| Report::new(error).change_context(KernelError::Internal))?;
        Ok(Self {
            pool,
            registry: Arc::new(BookSpecificationRegistry::default()),
        })
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for PostgresDatabase {
    type Transaction = PostgresConnection;
    async fn transact(&self) -> error_stack::Result<PostgresConnection, KernelError> {
        let con = self.pool.begin().await.convert_error()?;
        Ok(PostgresConnection(con))
    }
}

/// Open database transaction. Rolled back by sqlx when dropped uncommitted.
pub struct PostgresConnection(sqlx::Transaction<'static, Postgres>);

impl Deref for PostgresConnection {
    type Target = PgConnection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PostgresConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[async_trait::async_trait]
impl Transaction for PostgresConnection {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.0.commit().await.convert_error()
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        self.0.rollback().await.convert_error()
    }
}

impl<T: 'static + Sync + Send> ConvertError for Result<T, Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| match &error {
            Error::PoolTimedOut => Report::new(error).change_context(KernelError::Timeout),
            Error::Database(database) if database.is_unique_violation() => {
                Report::new(error).change_context(KernelError::Conflict)
            }
            _ => Report::new(error).change_context(KernelError::Internal),
        })
    }
}

impl DependOnBookQuery for PostgresDatabase {
    type BookQuery = PostgresBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &PostgresBookRepository
    }
}

impl DependOnBookModifier for PostgresDatabase {
    type BookModifier = PostgresBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &PostgresBookRepository
    }
}

impl DependOnCategoryQuery for PostgresDatabase {
    type CategoryQuery = PostgresCategoryRepository;
    fn category_query(&self) -> &Self::CategoryQuery {
        &PostgresCategoryRepository
    }
}

impl DependOnCategoryModifier for PostgresDatabase {
    type CategoryModifier = PostgresCategoryRepository;
    fn category_modifier(&self) -> &Self::CategoryModifier {
        &PostgresCategoryRepository
    }
}

impl DependOnUserQuery for PostgresDatabase {
    type UserQuery = PostgresUserRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &PostgresUserRepository
    }
}

impl DependOnUserModifier for PostgresDatabase {
    type UserModifier = PostgresUserRepository;
    fn user_modifier(&self) -> &Self::UserModifier {
        &PostgresUserRepository
    }
}

impl DependOnShoppingCartQuery for PostgresDatabase {
    type ShoppingCartQuery = PostgresShoppingCartRepository;
    fn shopping_cart_query(&self) -> &Self::ShoppingCartQuery {
        &PostgresShoppingCartRepository
    }
}

impl DependOnShoppingCartModifier for PostgresDatabase {
    type ShoppingCartModifier = PostgresShoppingCartRepository;
    fn shopping_cart_modifier(&self) -> &Self::ShoppingCartModifier {
        &PostgresShoppingCartRepository
    }
}

impl DependOnOrderQuery for PostgresDatabase {
    type OrderQuery = PostgresOrderRepository;
    fn order_query(&self) -> &Self::OrderQuery {
        &PostgresOrderRepository
    }
}

impl DependOnOrderModifier for PostgresDatabase {
    type OrderModifier = PostgresOrderRepository;
    fn order_modifier(&self) -> &Self::OrderModifier {
        &PostgresOrderRepository
    }
}

impl DependOnBookSpecificationRegistry for PostgresDatabase {
    fn book_specification_registry(&self) -> &BookSpecificationRegistry {
        &self.registry
    }
}

impl DependOnPasswordHasher for PostgresDatabase {
    type PasswordHasher = Argon2PasswordHasher;
    fn password_hasher(&self) -> &Self::PasswordHasher {
        &Argon2PasswordHasher
    }
}
