use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use error_stack::{Report, ResultExt};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use application::transfer::UserDto;
use kernel::prelude::entity::Role;
use kernel::{ErrorMessage, KernelError};

use crate::error::ErrorStatus;
use crate::handler::AppModule;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    email: String,
    roles: Vec<String>,
    exp: i64,
}

/// Signed bearer token handed out on login.
#[derive(Debug)]
pub struct IssuedToken(String);

impl IssuedToken {
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Issues and verifies HS256 tokens.
pub struct JwtIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiration: Duration,
}

impl JwtIssuer {
    pub fn new(secret: &str, expiration: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiration,
        }
    }

    pub fn issue(&self, user: &UserDto) -> error_stack::Result<IssuedToken, KernelError> {
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            roles: user.roles.clone(),
            exp: (OffsetDateTime::now_utc() + self.expiration).unix_timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .change_context(KernelError::Internal)
            .attach_printable("Failed to sign token")?;
        Ok(IssuedToken(token))
    }

    pub fn verify(&self, token: &str) -> error_stack::Result<AuthUser, KernelError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|error| {
                Report::new(error)
                    .change_context(KernelError::Unauthorized)
                    .attach_printable(ErrorMessage::new("Invalid or expired token"))
            })?;
        let Claims {
            sub, email, roles, ..
        } = data.claims;
        Ok(AuthUser {
            id: sub,
            email,
            roles,
        })
    }
}

/// Caller identity taken from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    id: Uuid,
    email: String,
    roles: Vec<String>,
}

impl AuthUser {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|role| role == Role::Admin.as_str())
    }

    pub fn require_admin(&self) -> Result<(), ErrorStatus> {
        if self.is_admin() {
            return Ok(());
        }
        Err(ErrorStatus::from(
            KernelError::Forbidden.with_message("Admin role required"),
        ))
    }
}

#[async_trait]
impl FromRequestParts<AppModule> for AuthUser {
    type Rejection = ErrorStatus;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppModule,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    ErrorStatus::from(
                        KernelError::Unauthorized.with_message("Missing bearer token"),
                    )
                })?;
        let user = state.jwt().verify(bearer.token())?;
        tracing::debug!("Authenticated request of user: {}", user.email());
        Ok(user)
    }
}
