use serde::Deserialize;

use application::transfer::{AuthenticateUserDto, RegisterUserDto};

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    email: String,
    password: String,
    repeat_password: String,
    first_name: String,
    last_name: String,
    shipping_address: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

pub struct UserTransformer;

impl Intake<RegisterUserRequest> for UserTransformer {
    type To = RegisterUserDto;
    fn emit(&self, input: RegisterUserRequest) -> Self::To {
        RegisterUserDto {
            email: input.email,
            password: input.password,
            repeat_password: input.repeat_password,
            first_name: input.first_name,
            last_name: input.last_name,
            shipping_address: input.shipping_address,
        }
    }
}

impl Intake<LoginRequest> for UserTransformer {
    type To = AuthenticateUserDto;
    fn emit(&self, input: LoginRequest) -> Self::To {
        AuthenticateUserDto {
            email: input.email,
            password: input.password,
        }
    }
}
