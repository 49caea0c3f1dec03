mod id;
mod item;

pub use self::{id::*, item::*};
use crate::entity::{Book, BookId, UserId, Version};
use crate::KernelError;
use destructure::Destructure;
use vodca::References;

/// A user's cart. Holds at most one line per book.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct ShoppingCart {
    id: ShoppingCartId,
    user_id: UserId,
    version: Version<ShoppingCart>,
    items: Vec<CartItem>,
}

impl ShoppingCart {
    pub fn new(
        id: ShoppingCartId,
        user_id: UserId,
        version: Version<ShoppingCart>,
        items: Vec<CartItem>,
    ) -> Self {
        Self {
            id,
            user_id,
            version,
            items,
        }
    }

    pub fn empty(id: ShoppingCartId, user_id: UserId) -> Self {
        Self::new(id, user_id, Version::initial(), Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find_item(&self, item_id: &CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id() == item_id)
    }

    pub fn find_item_by_book(&self, book_id: &BookId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.book().id() == book_id)
    }

    /// Adds `quantity` to the line holding `book`, or opens a new line with `new_item_id`.
    /// Fails with `KernelError::Validation` when the line would exceed `i32::MAX`.
    pub fn add_book(
        &mut self,
        book: Book,
        quantity: CartItemQuantity,
        new_item_id: CartItemId,
    ) -> error_stack::Result<(), KernelError> {
        match self
            .items
            .iter_mut()
            .find(|item| item.book().id() == book.id())
        {
            Some(item) => item.increase(&quantity).ok_or_else(|| {
                KernelError::Validation.with_message(format!(
                    "Quantity of book {} in the cart is too large",
                    book.id().as_ref()
                ))
            }),
            None => {
                self.items.push(CartItem::new(new_item_id, book, quantity));
                Ok(())
            }
        }
    }

    /// Replaces the quantity of a line. Zero keeps the line. Returns `false` if the
    /// line is not in this cart.
    pub fn update_quantity(&mut self, item_id: &CartItemId, quantity: CartItemQuantity) -> bool {
        match self.items.iter_mut().find(|item| item.id() == item_id) {
            Some(item) => {
                item.replace(quantity);
                true
            }
            None => false,
        }
    }

    /// Returns `false` if the line is not in this cart.
    pub fn remove_item(&mut self, item_id: &CartItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != item_id);
        before != self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
