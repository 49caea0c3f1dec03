use tracing::{debug, info};
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    BookQuery, DependOnBookQuery, DependOnShoppingCartQuery, ShoppingCartQuery,
};
use kernel::interface::update::{DependOnShoppingCartModifier, ShoppingCartModifier};
use kernel::prelude::entity::{
    BookId, CartItemId, CartItemQuantity, ShoppingCart, ShoppingCartId, UserId,
};
use kernel::KernelError;

use crate::transfer::{
    AddBookToCartDto, GetCartDto, RemoveCartItemDto, ShoppingCartDto, UpdateCartItemDto,
};

fn cart_not_found(user_id: &Uuid) -> error_stack::Report<KernelError> {
    KernelError::NotFound.with_message(format!("Can't find shopping cart for user: {user_id}"))
}

fn cart_item_not_found(item_id: &Uuid) -> error_stack::Report<KernelError> {
    KernelError::NotFound.with_message(format!("Can't find cart item by id: {item_id}"))
}

/// Every mutation writes the whole cart back under its version guard.
#[async_trait::async_trait]
pub trait ShoppingCartService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnShoppingCartQuery
    + DependOnShoppingCartModifier
    + DependOnBookQuery
{
    async fn ensure_cart_exists(
        &self,
        user_id: Uuid,
    ) -> error_stack::Result<ShoppingCartDto, KernelError> {
        let mut con = self.database_connection().transact().await?;

        let owner = UserId::new(user_id);
        if let Some(cart) = self
            .shopping_cart_query()
            .find_by_user_id(&mut con, &owner)
            .await?
        {
            return Ok(ShoppingCartDto::from(cart));
        }

        let cart = ShoppingCart::empty(ShoppingCartId::new(Uuid::new_v4()), owner);
        self.shopping_cart_modifier().create(&mut con, &cart).await?;
        con.commit().await?;

        info!("Created shopping cart for user: {user_id}");
        Ok(ShoppingCartDto::from(cart))
    }

    async fn get_cart(&self, dto: GetCartDto) -> error_stack::Result<ShoppingCartDto, KernelError> {
        let mut con = self.database_connection().transact().await?;
        let cart = self
            .shopping_cart_query()
            .find_by_user_id(&mut con, &UserId::new(dto.user_id))
            .await?
            .ok_or_else(|| cart_not_found(&dto.user_id))?;
        Ok(ShoppingCartDto::from(cart))
    }

    async fn add_book(
        &self,
        dto: AddBookToCartDto,
    ) -> error_stack::Result<ShoppingCartDto, KernelError> {
        dto.validate()?;
        let mut con = self.database_connection().transact().await?;

        let mut cart = self
            .shopping_cart_query()
            .find_by_user_id(&mut con, &UserId::new(dto.user_id))
            .await?
            .ok_or_else(|| cart_not_found(&dto.user_id))?;
        let book = self
            .book_query()
            .find_by_id(&mut con, &BookId::new(dto.book_id))
            .await?
            .ok_or_else(|| {
                KernelError::NotFound.with_message(format!("Can't find book by id: {}", dto.book_id))
            })?;

        cart.add_book(
            book,
            CartItemQuantity::new(dto.quantity),
            CartItemId::new(Uuid::new_v4()),
        )?;
        self.shopping_cart_modifier().update(&mut con, &cart).await?;
        con.commit().await?;

        debug!(
            "Added {} of book {} to cart of user {}",
            dto.quantity, dto.book_id, dto.user_id
        );
        Ok(ShoppingCartDto::from(cart))
    }

    async fn update_quantity(
        &self,
        dto: UpdateCartItemDto,
    ) -> error_stack::Result<ShoppingCartDto, KernelError> {
        dto.validate()?;
        let mut con = self.database_connection().transact().await?;

        let mut cart = self
            .shopping_cart_query()
            .find_by_user_id(&mut con, &UserId::new(dto.user_id))
            .await?
            .ok_or_else(|| cart_not_found(&dto.user_id))?;
        let item_id = CartItemId::new(dto.cart_item_id);
        if !cart.update_quantity(&item_id, CartItemQuantity::new(dto.quantity)) {
            return Err(cart_item_not_found(&dto.cart_item_id));
        }
        self.shopping_cart_modifier().update(&mut con, &cart).await?;
        con.commit().await?;

        debug!(
            "Set quantity of cart item {} to {}",
            dto.cart_item_id, dto.quantity
        );
        Ok(ShoppingCartDto::from(cart))
    }

    async fn remove_item(
        &self,
        dto: RemoveCartItemDto,
    ) -> error_stack::Result<ShoppingCartDto, KernelError> {
        let mut con = self.database_connection().transact().await?;

        let mut cart = self
            .shopping_cart_query()
            .find_by_user_id(&mut con, &UserId::new(dto.user_id))
            .await?
            .ok_or_else(|| cart_not_found(&dto.user_id))?;
        if !cart.remove_item(&CartItemId::new(dto.cart_item_id)) {
            return Err(cart_item_not_found(&dto.cart_item_id));
        }
        self.shopping_cart_modifier().update(&mut con, &cart).await?;
        con.commit().await?;

        debug!("Removed cart item {}", dto.cart_item_id);
        Ok(ShoppingCartDto::from(cart))
    }
}

impl<T> ShoppingCartService for T where
    T: DependOnShoppingCartQuery + DependOnShoppingCartModifier + DependOnBookQuery
{
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use uuid::Uuid;

    use driver::database::InMemoryDatabase;
    use kernel::KernelError;

    use crate::service::{CreateBookService, ShoppingCartService};
    use crate::transfer::{
        AddBookToCartDto, BookDto, CreateBookDto, GetCartDto, RemoveCartItemDto,
        UpdateCartItemDto,
    };

    async fn book(db: &InMemoryDatabase, isbn: &str) -> BookDto {
        db.create_book(CreateBookDto {
            title: format!("Book {isbn}"),
            author: "Author".into(),
            isbn: isbn.into(),
            price: Decimal::from_str("9.99").unwrap(),
            description: None,
            cover_image: None,
            category_ids: Vec::new(),
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn ensure_cart_exists_is_idempotent() {
        let db = InMemoryDatabase::new();
        let user_id = Uuid::new_v4();

        let first = db.ensure_cart_exists(user_id).await.unwrap();
        let second = db.ensure_cart_exists(user_id).await.unwrap();
        assert_eq!(first.id, second.id);

        let error = db
            .get_cart(GetCartDto {
                user_id: Uuid::new_v4(),
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::NotFound);
    }

    #[tokio::test]
    async fn adding_a_book_twice_accumulates() {
        let db = InMemoryDatabase::new();
        let user_id = Uuid::new_v4();
        db.ensure_cart_exists(user_id).await.unwrap();
        let book = book(&db, "111").await;

        for quantity in [2, 3] {
            db.add_book(AddBookToCartDto {
                user_id,
                book_id: book.id,
                quantity,
            })
            .await
            .unwrap();
        }

        let cart = db.get_cart(GetCartDto { user_id }).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 5);
        assert_eq!(cart.items[0].book_id, book.id);
    }

    #[tokio::test]
    async fn unknown_items_leave_the_cart_untouched() {
        let db = InMemoryDatabase::new();
        let user_id = Uuid::new_v4();
        db.ensure_cart_exists(user_id).await.unwrap();
        let book = book(&db, "111").await;
        let before = db
            .add_book(AddBookToCartDto {
                user_id,
                book_id: book.id,
                quantity: 1,
            })
            .await
            .unwrap();

        let error = db
            .update_quantity(UpdateCartItemDto {
                user_id,
                cart_item_id: Uuid::new_v4(),
                quantity: 4,
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::NotFound);

        let error = db
            .remove_item(RemoveCartItemDto {
                user_id,
                cart_item_id: Uuid::new_v4(),
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::NotFound);

        let after = db.get_cart(GetCartDto { user_id }).await.unwrap();
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn update_and_remove_lines() {
        let db = InMemoryDatabase::new();
        let user_id = Uuid::new_v4();
        db.ensure_cart_exists(user_id).await.unwrap();
        let first = book(&db, "111").await;
        let second = book(&db, "222").await;
        db.add_book(AddBookToCartDto {
            user_id,
            book_id: first.id,
            quantity: 1,
        })
        .await
        .unwrap();
        let cart = db
            .add_book(AddBookToCartDto {
                user_id,
                book_id: second.id,
                quantity: 1,
            })
            .await
            .unwrap();
        let first_line = cart
            .items
            .iter()
            .find(|item| item.book_id == first.id)
            .unwrap()
            .id;

        let cart = db
            .update_quantity(UpdateCartItemDto {
                user_id,
                cart_item_id: first_line,
                quantity: 0,
            })
            .await
            .unwrap();
        assert_eq!(cart.items.len(), 2);

        let cart = db
            .remove_item(RemoveCartItemDto {
                user_id,
                cart_item_id: first_line,
            })
            .await
            .unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].book_id, second.id);
    }

    #[tokio::test]
    async fn overflowing_line_is_rejected_and_cart_kept() {
        let db = InMemoryDatabase::new();
        let user_id = Uuid::new_v4();
        db.ensure_cart_exists(user_id).await.unwrap();
        let book = book(&db, "111").await;
        let before = db
            .add_book(AddBookToCartDto {
                user_id,
                book_id: book.id,
                quantity: i32::MAX,
            })
            .await
            .unwrap();

        let error = db
            .add_book(AddBookToCartDto {
                user_id,
                book_id: book.id,
                quantity: 1,
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Validation);

        let after = db.get_cart(GetCartDto { user_id }).await.unwrap();
        assert_eq!(after, before);
        assert_eq!(after.items[0].quantity, i32::MAX);
    }

    #[tokio::test]
    async fn quantities_are_validated() {
        let db = InMemoryDatabase::new();
        let user_id = Uuid::new_v4();
        db.ensure_cart_exists(user_id).await.unwrap();

        let error = db
            .add_book(AddBookToCartDto {
                user_id,
                book_id: Uuid::new_v4(),
                quantity: 0,
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Validation);

        let error = db
            .add_book(AddBookToCartDto {
                user_id,
                book_id: Uuid::new_v4(),
                quantity: 1,
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::NotFound);
    }
}
