use rust_decimal::Decimal;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{DestructOrder, DestructOrderItem, Order, OrderItem};
use kernel::KernelError;

use crate::transfer::PageRequestDto;
use crate::validation::Validator;

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemDto {
    pub id: Uuid,
    pub book_id: Uuid,
    pub book_title: String,
    pub book_author: String,
    pub quantity: i32,
    pub price: Decimal,
}

impl From<OrderItem> for OrderItemDto {
    fn from(value: OrderItem) -> Self {
        let DestructOrderItem {
            id,
            book_id,
            book_title,
            book_author,
            quantity,
            price,
        } = value.into_destruct();
        Self {
            id: id.into(),
            book_id: book_id.into(),
            book_title: book_title.into(),
            book_author: book_author.into(),
            quantity: quantity.into(),
            price: price.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub shipping_address: String,
    pub status: String,
    pub total: Decimal,
    pub order_date: OffsetDateTime,
    pub items: Vec<OrderItemDto>,
}

impl From<Order> for OrderDto {
    fn from(value: Order) -> Self {
        let DestructOrder {
            id,
            user_id,
            first_name,
            last_name,
            shipping_address,
            status,
            total,
            order_date,
            items,
        } = value.into_destruct();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            shipping_address: shipping_address.into(),
            status: status.to_string(),
            total: total.into(),
            order_date: order_date.into(),
            items: items.into_iter().map(OrderItemDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateOrderDto {
    pub user_id: Uuid,
    pub shipping_address: String,
}

impl CreateOrderDto {
    pub fn validate(&self) -> error_stack::Result<(), KernelError> {
        Validator::new()
            .not_blank(
                "shippingAddress",
                &self.shipping_address,
                "Shipping address is required",
            )
            .finish()
    }
}

pub struct GetOrdersDto {
    pub user_id: Uuid,
    pub page: PageRequestDto,
}

pub struct GetOrderItemsDto {
    pub user_id: Uuid,
    pub order_id: Uuid,
}

pub struct GetOrderItemDto {
    pub user_id: Uuid,
    pub order_id: Uuid,
    pub item_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct UpdateOrderStatusDto {
    pub order_id: Uuid,
    pub status: String,
}
