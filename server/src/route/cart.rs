use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use uuid::Uuid;

use application::service::ShoppingCartService;

use crate::auth::AuthUser;
use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    AddBookToCartRequest, CartTransformer, GetCartRequest, RemoveCartItemRequest,
    UpdateCartItemRequest,
};
use crate::response::CartPresenter;

/// Every route works on the cart of the authenticated caller.
pub trait CartRouter {
    fn route_cart(self) -> Self;
}

impl CartRouter for Router<AppModule> {
    fn route_cart(self) -> Self {
        self.route(
            "/cart",
            get(
                |State(module): State<AppModule>, user: AuthUser| async move {
                    Controller::new(CartTransformer, CartPresenter)
                        .intake(GetCartRequest::new(user.id()))
                        .handle(|dto| async move { module.pgpool().get_cart(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule>,
                 user: AuthUser,
                 Json(req): Json<AddBookToCartRequest>| async move {
                    Controller::new(CartTransformer, CartPresenter)
                        .intake((user.id(), req))
                        .handle(|dto| async move { module.pgpool().add_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/cart/items/:id",
            put(
                |State(module): State<AppModule>,
                 user: AuthUser,
                 Path(id): Path<Uuid>,
                 Json(req): Json<UpdateCartItemRequest>| async move {
                    Controller::new(CartTransformer, CartPresenter)
                        .intake((RemoveCartItemRequest::new(user.id(), id), req))
                        .handle(|dto| async move { module.pgpool().update_quantity(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>, user: AuthUser, Path(id): Path<Uuid>| async move {
                    Controller::new(CartTransformer, CartPresenter)
                        .intake(RemoveCartItemRequest::new(user.id(), id))
                        .handle(|dto| async move { module.pgpool().remove_item(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
