use serde::Deserialize;
use uuid::Uuid;

use application::transfer::{
    CreateOrderDto, GetOrderItemDto, GetOrderItemsDto, GetOrdersDto, UpdateOrderStatusDto,
};

use crate::controller::Intake;
use crate::request::PageQuery;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    shipping_address: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    status: String,
}

/// An order of the calling user, optionally narrowed to one of its items.
#[derive(Debug)]
pub struct OrderItemsRequest {
    user_id: Uuid,
    order_id: Uuid,
}

impl OrderItemsRequest {
    pub fn new(user_id: Uuid, order_id: Uuid) -> Self {
        Self { user_id, order_id }
    }
}

pub struct OrderTransformer;

impl Intake<(Uuid, CreateOrderRequest)> for OrderTransformer {
    type To = CreateOrderDto;
    fn emit(&self, input: (Uuid, CreateOrderRequest)) -> Self::To {
        let (user_id, input) = input;
        CreateOrderDto {
            user_id,
            shipping_address: input.shipping_address,
        }
    }
}

impl Intake<(Uuid, PageQuery)> for OrderTransformer {
    type To = GetOrdersDto;
    fn emit(&self, input: (Uuid, PageQuery)) -> Self::To {
        let (user_id, page) = input;
        GetOrdersDto {
            user_id,
            page: page.into(),
        }
    }
}

impl Intake<OrderItemsRequest> for OrderTransformer {
    type To = GetOrderItemsDto;
    fn emit(&self, input: OrderItemsRequest) -> Self::To {
        GetOrderItemsDto {
            user_id: input.user_id,
            order_id: input.order_id,
        }
    }
}

impl Intake<(OrderItemsRequest, Uuid)> for OrderTransformer {
    type To = GetOrderItemDto;
    fn emit(&self, input: (OrderItemsRequest, Uuid)) -> Self::To {
        let (order, item_id) = input;
        GetOrderItemDto {
            user_id: order.user_id,
            order_id: order.order_id,
            item_id,
        }
    }
}

impl Intake<(Uuid, UpdateOrderStatusRequest)> for OrderTransformer {
    type To = UpdateOrderStatusDto;
    fn emit(&self, input: (Uuid, UpdateOrderStatusRequest)) -> Self::To {
        let (order_id, input) = input;
        UpdateOrderStatusDto {
            order_id,
            status: input.status,
        }
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use crate::controller::Intake;
    use crate::request::PageQuery;

    use super::{OrderItemsRequest, OrderTransformer, UpdateOrderStatusRequest};

    #[test]
    fn path_and_caller_land_in_the_dto() {
        let user_id = Uuid::new_v4();
        let order_id = Uuid::new_v4();
        let item_id = Uuid::new_v4();

        let dto = OrderTransformer.emit((OrderItemsRequest::new(user_id, order_id), item_id));
        assert_eq!(
            (dto.user_id, dto.order_id, dto.item_id),
            (user_id, order_id, item_id)
        );

        let dto = OrderTransformer.emit((user_id, PageQuery::new(Some(5), None, None)));
        assert_eq!(dto.user_id, user_id);
        assert_eq!(dto.page.limit, Some(5));

        let status: UpdateOrderStatusRequest =
            serde_json::from_str(r#"{"status":"SHIPPED"}"#).unwrap();
        let dto = OrderTransformer.emit((order_id, status));
        assert_eq!(dto.status, "SHIPPED");
    }
}
