use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use application::service::{
    CreateCategoryService, DeleteCategoryService, GetBookService, GetCategoryService,
    UpdateCategoryService,
};

use crate::auth::AuthUser;
use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    CategoryTransformer, CreateCategoryRequest, DeleteCategoryRequest, GetCategoryRequest,
    PageQuery, UpdateCategoryRequest,
};
use crate::response::CategoryPresenter;

pub trait CategoryRouter {
    fn route_category(self) -> Self;
}

impl CategoryRouter for Router<AppModule> {
    fn route_category(self) -> Self {
        self.route(
            "/categories",
            get(
                |State(module): State<AppModule>, _: AuthUser, Query(req): Query<PageQuery>| async move {
                    Controller::new(CategoryTransformer, CategoryPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.pgpool().get_all_categories(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule>,
                 user: AuthUser,
                 Json(req): Json<CreateCategoryRequest>| async move {
                    user.require_admin()?;
                    Controller::new(CategoryTransformer, CategoryPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.pgpool().create_category(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/categories/:id",
            get(
                |State(module): State<AppModule>, _: AuthUser, Path(id): Path<Uuid>| async move {
                    Controller::new(CategoryTransformer, CategoryPresenter)
                        .intake(GetCategoryRequest::new(id))
                        .handle(|dto| async move { module.pgpool().get_category(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .put(
                |State(module): State<AppModule>,
                 user: AuthUser,
                 Path(id): Path<Uuid>,
                 Json(req): Json<UpdateCategoryRequest>| async move {
                    user.require_admin()?;
                    Controller::new(CategoryTransformer, CategoryPresenter)
                        .intake((id, req))
                        .handle(|dto| async move { module.pgpool().update_category(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>, user: AuthUser, Path(id): Path<Uuid>| async move {
                    user.require_admin()?;
                    Controller::new(CategoryTransformer, CategoryPresenter)
                        .intake(DeleteCategoryRequest::new(id))
                        .handle(|dto| async move { module.pgpool().delete_category(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/categories/:id/books",
            get(
                |State(module): State<AppModule>,
                 _: AuthUser,
                 Path(id): Path<Uuid>,
                 Query(req): Query<PageQuery>| async move {
                    Controller::new(CategoryTransformer, CategoryPresenter)
                        .intake((id, req))
                        .handle(|dto| async move {
                            module.pgpool().get_books_by_category(dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
