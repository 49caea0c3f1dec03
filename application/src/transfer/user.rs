use uuid::Uuid;

use kernel::prelude::entity::{DestructUser, User};
use kernel::KernelError;

use crate::validation::Validator;

const PASSWORD_MIN_CHARS: usize = 8;
const PASSWORD_MAX_CHARS: usize = 25;
const SHIPPING_ADDRESS_MAX_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub shipping_address: Option<String>,
    pub roles: Vec<String>,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let DestructUser {
            id,
            email,
            first_name,
            last_name,
            shipping_address,
            roles,
            ..
        } = value.into_destruct();
        Self {
            id: id.into(),
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            shipping_address: shipping_address.map(Into::into),
            roles: roles.into_iter().map(|role| role.to_string()).collect(),
        }
    }
}

#[derive(Clone)]
pub struct RegisterUserDto {
    pub email: String,
    pub password: String,
    pub repeat_password: String,
    pub first_name: String,
    pub last_name: String,
    pub shipping_address: Option<String>,
}

impl RegisterUserDto {
    pub fn validate(&self) -> error_stack::Result<(), KernelError> {
        let password_length = |password: &str| {
            (PASSWORD_MIN_CHARS..=PASSWORD_MAX_CHARS).contains(&password.chars().count())
        };
        let mut validator = Validator::new();
        validator
            .not_blank("email", &self.email, "Email is required. Please provide your email.")
            .email("email", &self.email, "Invalid format of email")
            .require(
                "password",
                password_length(&self.password),
                "Password must be between 8 and 25 characters",
            )
            .require(
                "repeatPassword",
                password_length(&self.repeat_password),
                "Repeat password must be between 8 and 25 characters",
            )
            .require(
                "repeatPassword",
                self.password == self.repeat_password,
                "Password and repeat password must match",
            )
            .not_blank(
                "firstName",
                &self.first_name,
                "First name is required. Please provide your first name.",
            )
            .not_blank(
                "lastName",
                &self.last_name,
                "Last name is required. Please provide your last name.",
            );
        if let Some(address) = &self.shipping_address {
            validator.max_chars(
                "shippingAddress",
                address,
                SHIPPING_ADDRESS_MAX_CHARS,
                "Shipping address must not be longer than 200 characters",
            );
        }
        validator.finish()
    }
}

#[derive(Clone)]
pub struct AuthenticateUserDto {
    pub email: String,
    pub password: String,
}
