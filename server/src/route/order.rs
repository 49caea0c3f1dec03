use axum::extract::{Path, Query, State};
use axum::routing::{get, patch};
use axum::{Json, Router};
use uuid::Uuid;

use application::service::{CreateOrderService, GetOrderService, UpdateOrderStatusService};

use crate::auth::AuthUser;
use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    CreateOrderRequest, OrderItemsRequest, OrderTransformer, PageQuery, UpdateOrderStatusRequest,
};
use crate::response::OrderPresenter;

pub trait OrderRouter {
    fn route_order(self) -> Self;
}

impl OrderRouter for Router<AppModule> {
    fn route_order(self) -> Self {
        self.route(
            "/orders",
            get(
                |State(module): State<AppModule>, user: AuthUser, Query(req): Query<PageQuery>| async move {
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake((user.id(), req))
                        .handle(|dto| async move { module.pgpool().list_orders(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule>,
                 user: AuthUser,
                 Json(req): Json<CreateOrderRequest>| async move {
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake((user.id(), req))
                        .handle(|dto| async move { module.pgpool().create_order(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/orders/:id",
            patch(
                |State(module): State<AppModule>,
                 user: AuthUser,
                 Path(id): Path<Uuid>,
                 Json(req): Json<UpdateOrderStatusRequest>| async move {
                    user.require_admin()?;
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake((id, req))
                        .handle(|dto| async move { module.pgpool().update_status(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/orders/:id/items",
            get(
                |State(module): State<AppModule>, user: AuthUser, Path(id): Path<Uuid>| async move {
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake(OrderItemsRequest::new(user.id(), id))
                        .handle(|dto| async move { module.pgpool().get_order_items(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/orders/:id/items/:item_id",
            get(
                |State(module): State<AppModule>,
                 user: AuthUser,
                 Path((id, item_id)): Path<(Uuid, Uuid)>| async move {
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake((OrderItemsRequest::new(user.id(), id), item_id))
                        .handle(|dto| async move { module.pgpool().get_order_item(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
