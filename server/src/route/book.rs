use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use application::service::{
    CreateBookService, DeleteBookService, GetBookService, UpdateBookService,
};

use crate::auth::AuthUser;
use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    BookTransformer, CreateBookRequest, DeleteBookRequest, GetBookRequest, PageQuery,
    SearchBookQuery, UpdateBookRequest,
};
use crate::response::BookPresenter;

pub trait BookRouter {
    fn route_book(self) -> Self;
}

impl BookRouter for Router<AppModule> {
    fn route_book(self) -> Self {
        self.route(
            "/books",
            get(
                |State(module): State<AppModule>, _: AuthUser, Query(req): Query<PageQuery>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.pgpool().get_all_books(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule>,
                 user: AuthUser,
                 Json(req): Json<CreateBookRequest>| async move {
                    user.require_admin()?;
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.pgpool().create_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/books/search",
            get(
                |State(module): State<AppModule>,
                 _: AuthUser,
                 Query(req): Query<SearchBookQuery>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.pgpool().search_books(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/books/:id",
            get(
                |State(module): State<AppModule>, _: AuthUser, Path(id): Path<Uuid>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(GetBookRequest::new(id))
                        .handle(|dto| async move { module.pgpool().get_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .put(
                |State(module): State<AppModule>,
                 user: AuthUser,
                 Path(id): Path<Uuid>,
                 Json(req): Json<UpdateBookRequest>| async move {
                    user.require_admin()?;
                    Controller::new(BookTransformer, BookPresenter)
                        .intake((id, req))
                        .handle(|dto| async move { module.pgpool().update_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>, user: AuthUser, Path(id): Path<Uuid>| async move {
                    user.require_admin()?;
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(DeleteBookRequest::new(id))
                        .handle(|dto| async move { module.pgpool().delete_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
