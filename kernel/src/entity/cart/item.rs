use crate::entity::{Book, CartItemId};
use destructure::Destructure;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln, References};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct CartItemQuantity(i32);

impl CartItemQuantity {
    pub fn new(quantity: impl Into<i32>) -> Self {
        Self(quantity.into())
    }
}

/// One cart line. The referenced book is loaded eagerly with the cart.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct CartItem {
    id: CartItemId,
    book: Book,
    quantity: CartItemQuantity,
}

impl CartItem {
    pub fn new(id: CartItemId, book: Book, quantity: CartItemQuantity) -> Self {
        Self { id, book, quantity }
    }

    /// Returns `None` and leaves the line untouched when the sum does not fit.
    pub(in crate::entity) fn increase(&mut self, by: &CartItemQuantity) -> Option<()> {
        self.quantity = CartItemQuantity(self.quantity.0.checked_add(by.0)?);
        Some(())
    }

    pub(in crate::entity) fn replace(&mut self, quantity: CartItemQuantity) {
        self.quantity = quantity;
    }
}
