use rust_decimal::Decimal;
use uuid::Uuid;

use kernel::prelude::entity::{CartItem, DestructCartItem, DestructShoppingCart, ShoppingCart};
use kernel::KernelError;

use crate::validation::Validator;

#[derive(Debug, Clone, PartialEq)]
pub struct CartItemDto {
    pub id: Uuid,
    pub book_id: Uuid,
    pub book_title: String,
    pub price: Decimal,
    pub quantity: i32,
}

impl From<CartItem> for CartItemDto {
    fn from(value: CartItem) -> Self {
        let DestructCartItem { id, book, quantity } = value.into_destruct();
        Self {
            id: id.into(),
            book_id: (*book.id()).into(),
            book_title: book.title().as_ref().clone(),
            price: *book.price().as_ref(),
            quantity: quantity.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingCartDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<CartItemDto>,
}

impl From<ShoppingCart> for ShoppingCartDto {
    fn from(value: ShoppingCart) -> Self {
        let DestructShoppingCart {
            id, user_id, items, ..
        } = value.into_destruct();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            items: items.into_iter().map(CartItemDto::from).collect(),
        }
    }
}

pub struct GetCartDto {
    pub user_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct AddBookToCartDto {
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub quantity: i32,
}

impl AddBookToCartDto {
    pub fn validate(&self) -> error_stack::Result<(), KernelError> {
        Validator::new()
            .require(
                "quantity",
                self.quantity >= 1,
                "Quantity must be a positive number",
            )
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct UpdateCartItemDto {
    pub user_id: Uuid,
    pub cart_item_id: Uuid,
    pub quantity: i32,
}

impl UpdateCartItemDto {
    pub fn validate(&self) -> error_stack::Result<(), KernelError> {
        Validator::new()
            .require(
                "quantity",
                self.quantity >= 0,
                "Quantity value must be zero or a positive number",
            )
            .finish()
    }
}

pub struct RemoveCartItemDto {
    pub user_id: Uuid,
    pub cart_item_id: Uuid,
}
