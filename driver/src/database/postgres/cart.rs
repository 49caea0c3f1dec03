use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::ShoppingCartQuery;
use kernel::interface::update::ShoppingCartModifier;
use kernel::prelude::entity::{
    Book, CartItem, CartItemId, CartItemQuantity, ShoppingCart, ShoppingCartId, UserId, Version,
};
use kernel::KernelError;

use crate::database::postgres::book::BookRow;
use crate::database::postgres::PostgresConnection;
use crate::error::{on_conflict, ConvertError};

pub struct PostgresShoppingCartRepository;

#[async_trait::async_trait]
impl ShoppingCartQuery for PostgresShoppingCartRepository {
    type Transaction = PostgresConnection;

    async fn find_by_user_id(
        &self,
        con: &mut PostgresConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Option<ShoppingCart>, KernelError> {
        PgShoppingCartInternal::find_by_user_id(con, user_id).await
    }
}

#[async_trait::async_trait]
impl ShoppingCartModifier for PostgresShoppingCartRepository {
    type Transaction = PostgresConnection;

    async fn create(
        &self,
        con: &mut PostgresConnection,
        cart: &ShoppingCart,
    ) -> error_stack::Result<(), KernelError> {
        PgShoppingCartInternal::create(con, cart).await
    }

    async fn update(
        &self,
        con: &mut PostgresConnection,
        cart: &ShoppingCart,
    ) -> error_stack::Result<(), KernelError> {
        PgShoppingCartInternal::update(con, cart).await
    }
}

#[derive(sqlx::FromRow)]
struct ShoppingCartRow {
    id: Uuid,
    user_id: Uuid,
    version: i64,
}

#[derive(sqlx::FromRow)]
struct CartItemRow {
    item_id: Uuid,
    quantity: i32,
    #[sqlx(flatten)]
    book: BookRow,
}

impl From<CartItemRow> for CartItem {
    fn from(value: CartItemRow) -> Self {
        CartItem::new(
            CartItemId::new(value.item_id),
            Book::from(value.book),
            CartItemQuantity::new(value.quantity),
        )
    }
}

pub(in crate::database) struct PgShoppingCartInternal;

impl PgShoppingCartInternal {
    async fn find_by_user_id(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Option<ShoppingCart>, KernelError> {
        let Some(cart) = sqlx::query_as::<_, ShoppingCartRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, version
            FROM shopping_carts
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_optional(&mut *con)
        .await
        .convert_error()?
        else {
            return Ok(None);
        };

        // lines of deleted books drop out of the cart
        let items = sqlx::query_as::<_, CartItemRow>(
            // language=postgresql
            r#"
            SELECT ci.id AS item_id, ci.quantity,
                   b.id, b.title, b.author, b.isbn, b.price, b.description, b.cover_image, b.is_deleted,
                   COALESCE(ARRAY_AGG(bc.category_id) FILTER (WHERE bc.category_id IS NOT NULL), '{}') AS category_ids
            FROM cart_items ci
            JOIN books b ON b.id = ci.book_id
            LEFT JOIN books_categories bc ON bc.book_id = b.id
            WHERE ci.cart_id = $1 AND b.is_deleted = FALSE
            GROUP BY ci.id, b.id
            ORDER BY ci.position
            "#,
        )
        .bind(cart.id)
        .fetch_all(&mut *con)
        .await
        .convert_error()?;

        Ok(Some(ShoppingCart::new(
            ShoppingCartId::new(cart.id),
            UserId::new(cart.user_id),
            Version::new(cart.version),
            items.into_iter().map(CartItem::from).collect(),
        )))
    }

    async fn create(
        con: &mut PgConnection,
        cart: &ShoppingCart,
    ) -> error_stack::Result<(), KernelError> {
        let inserted = sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO shopping_carts (id, user_id, version)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(cart.id().as_ref())
        .bind(cart.user_id().as_ref())
        .bind(cart.version().as_ref())
        .execute(&mut *con)
        .await
        .convert_error();
        on_conflict(inserted, || {
            format!(
                "User {} already has a shopping cart",
                cart.user_id().as_ref()
            )
        })?;
        Self::insert_items(con, cart).await
    }

    async fn update(
        con: &mut PgConnection,
        cart: &ShoppingCart,
    ) -> error_stack::Result<(), KernelError> {
        let bumped = sqlx::query(
            // language=postgresql
            r#"
            UPDATE shopping_carts
            SET version = version + 1
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(cart.id().as_ref())
        .bind(cart.version().as_ref())
        .execute(&mut *con)
        .await
        .convert_error()?;
        if bumped.rows_affected() == 0 {
            return Err(KernelError::Concurrency.with_message(format!(
                "Shopping cart {} was modified concurrently",
                cart.id().as_ref()
            )));
        }

        // language=postgresql
        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart.id().as_ref())
            .execute(&mut *con)
            .await
            .convert_error()?;
        Self::insert_items(con, cart).await
    }

    async fn insert_items(
        con: &mut PgConnection,
        cart: &ShoppingCart,
    ) -> error_stack::Result<(), KernelError> {
        if cart.is_empty() {
            return Ok(());
        }
        let mut ids = Vec::with_capacity(cart.items().len());
        let mut book_ids = Vec::with_capacity(cart.items().len());
        let mut quantities = Vec::with_capacity(cart.items().len());
        for item in cart.items() {
            ids.push(*AsRef::<Uuid>::as_ref(item.id()));
            book_ids.push(*AsRef::<Uuid>::as_ref(item.book().id()));
            quantities.push(*AsRef::<i32>::as_ref(item.quantity()));
        }
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO cart_items (id, cart_id, book_id, quantity, position)
            SELECT line.id, $1, line.book_id, line.quantity, line.position
            FROM UNNEST($2::UUID[], $3::UUID[], $4::INT4[]) WITH ORDINALITY
                AS line(id, book_id, quantity, position)
            "#,
        )
        .bind(cart.id().as_ref())
        .bind(ids)
        .bind(book_ids)
        .bind(quantities)
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use rust_decimal::Decimal;
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::ShoppingCartQuery;
    use kernel::interface::update::{BookModifier, ShoppingCartModifier};
    use kernel::prelude::entity::{
        Book, BookAuthor, BookId, BookPrice, BookTitle, CartItemId, CartItemQuantity, IsDeleted,
        Isbn, ShoppingCart, ShoppingCartId, UserId, Version,
    };
    use kernel::KernelError;

    use crate::database::{
        PostgresBookRepository, PostgresDatabase, PostgresShoppingCartRepository,
    };

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn versioned_writes() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let book = Book::new(
            BookId::new(Uuid::new_v4()),
            BookTitle::new("Dune"),
            BookAuthor::new("Frank Herbert"),
            Isbn::new(Uuid::new_v4().simple().to_string()),
            BookPrice::new(Decimal::new(999, 2)),
            None,
            None,
            BTreeSet::new(),
            IsDeleted::active(),
        );
        PostgresBookRepository.create(&mut con, &book).await?;

        let user_id = UserId::new(Uuid::new_v4());
        let cart = ShoppingCart::empty(ShoppingCartId::new(Uuid::new_v4()), user_id);
        PostgresShoppingCartRepository.create(&mut con, &cart).await?;

        let mut filled = cart.clone();
        filled.add_book(
            book,
            CartItemQuantity::new(2),
            CartItemId::new(Uuid::new_v4()),
        )?;
        PostgresShoppingCartRepository.update(&mut con, &filled).await?;

        let loaded = PostgresShoppingCartRepository
            .find_by_user_id(&mut con, &user_id)
            .await?
            .unwrap();
        assert_eq!(loaded.version(), &Version::new(1));
        assert_eq!(loaded.items(), filled.items());

        let error = PostgresShoppingCartRepository
            .update(&mut con, &cart)
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Concurrency);
        Ok(())
    }
}
