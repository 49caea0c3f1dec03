use serde::Deserialize;
use uuid::Uuid;

use application::transfer::{AddBookToCartDto, GetCartDto, RemoveCartItemDto, UpdateCartItemDto};

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBookToCartRequest {
    book_id: Uuid,
    quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCartItemRequest {
    quantity: i32,
}

/// Cart of the calling user.
#[derive(Debug)]
pub struct GetCartRequest {
    user_id: Uuid,
}

impl GetCartRequest {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

#[derive(Debug)]
pub struct RemoveCartItemRequest {
    user_id: Uuid,
    cart_item_id: Uuid,
}

impl RemoveCartItemRequest {
    pub fn new(user_id: Uuid, cart_item_id: Uuid) -> Self {
        Self {
            user_id,
            cart_item_id,
        }
    }
}

pub struct CartTransformer;

impl Intake<GetCartRequest> for CartTransformer {
    type To = GetCartDto;
    fn emit(&self, input: GetCartRequest) -> Self::To {
        GetCartDto {
            user_id: input.user_id,
        }
    }
}

impl Intake<(Uuid, AddBookToCartRequest)> for CartTransformer {
    type To = AddBookToCartDto;
    fn emit(&self, input: (Uuid, AddBookToCartRequest)) -> Self::To {
        let (user_id, input) = input;
        AddBookToCartDto {
            user_id,
            book_id: input.book_id,
            quantity: input.quantity,
        }
    }
}

impl Intake<(RemoveCartItemRequest, UpdateCartItemRequest)> for CartTransformer {
    type To = UpdateCartItemDto;
    fn emit(&self, input: (RemoveCartItemRequest, UpdateCartItemRequest)) -> Self::To {
        let (target, input) = input;
        UpdateCartItemDto {
            user_id: target.user_id,
            cart_item_id: target.cart_item_id,
            quantity: input.quantity,
        }
    }
}

impl Intake<RemoveCartItemRequest> for CartTransformer {
    type To = RemoveCartItemDto;
    fn emit(&self, input: RemoveCartItemRequest) -> Self::To {
        RemoveCartItemDto {
            user_id: input.user_id,
            cart_item_id: input.cart_item_id,
        }
    }
}
