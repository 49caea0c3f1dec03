use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

use application::transfer::UserDto;

use crate::auth::IssuedToken;
use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    id: Uuid,
    email: String,
    first_name: String,
    last_name: String,
    shipping_address: Option<String>,
    roles: Vec<String>,
}

impl IntoResponse for UserResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    token: String,
}

impl IntoResponse for LoginResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

pub struct UserPresenter;

impl Exhaust<UserDto> for UserPresenter {
    type To = UserResponse;
    fn emit(&self, input: UserDto) -> Self::To {
        UserResponse {
            id: input.id,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            shipping_address: input.shipping_address,
            roles: input.roles,
        }
    }
}

impl Exhaust<IssuedToken> for UserPresenter {
    type To = LoginResponse;
    fn emit(&self, input: IssuedToken) -> Self::To {
        LoginResponse {
            token: input.into_inner(),
        }
    }
}
