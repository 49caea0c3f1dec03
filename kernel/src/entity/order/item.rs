use crate::entity::{BookAuthor, BookId, BookTitle, CartItem, OrderItemId};
use destructure::Destructure;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln, References};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct OrderItemQuantity(i32);

impl OrderItemQuantity {
    pub fn new(quantity: impl Into<i32>) -> Self {
        Self(quantity.into())
    }
}

/// Price of one unit at the moment the order was placed.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct UnitPrice(Decimal);

impl UnitPrice {
    pub fn new(price: impl Into<Decimal>) -> Self {
        Self(price.into())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct OrderItem {
    id: OrderItemId,
    book_id: BookId,
    book_title: BookTitle,
    book_author: BookAuthor,
    quantity: OrderItemQuantity,
    price: UnitPrice,
}

impl OrderItem {
    pub fn new(
        id: OrderItemId,
        book_id: BookId,
        book_title: BookTitle,
        book_author: BookAuthor,
        quantity: OrderItemQuantity,
        price: UnitPrice,
    ) -> Self {
        Self {
            id,
            book_id,
            book_title,
            book_author,
            quantity,
            price,
        }
    }

    pub fn snapshot(id: OrderItemId, line: &CartItem) -> Self {
        let book = line.book();
        Self::new(
            id,
            *book.id(),
            book.title().clone(),
            book.author().clone(),
            OrderItemQuantity::new(*line.quantity().as_ref()),
            UnitPrice::new(*book.price().as_ref()),
        )
    }

    pub fn line_total(&self) -> Decimal {
        self.price.0 * Decimal::from(self.quantity.0)
    }
}
