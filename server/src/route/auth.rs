use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use application::service::{AuthenticateUserService, RegisterUserService, ShoppingCartService};

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{LoginRequest, RegisterUserRequest, UserTransformer};
use crate::response::UserPresenter;

pub trait AuthRouter {
    fn route_auth(self) -> Self;
}

impl AuthRouter for Router<AppModule> {
    fn route_auth(self) -> Self {
        self.route(
            "/auth/registration",
            post(
                |State(module): State<AppModule>, Json(req): Json<RegisterUserRequest>| async move {
                    Controller::new(UserTransformer, UserPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.pgpool().register(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/auth/login",
            post(
                |State(module): State<AppModule>, Json(req): Json<LoginRequest>| async move {
                    Controller::new(UserTransformer, UserPresenter)
                        .intake(req)
                        .handle(|dto| async move {
                            let user = module.pgpool().authenticate(dto).await?;
                            // accounts created before carts existed get one on first login
                            module.pgpool().ensure_cart_exists(user.id).await?;
                            module.jwt().issue(&user)
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
