use std::collections::BTreeSet;

use error_stack::Report;
use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::UserQuery;
use kernel::interface::update::UserModifier;
use kernel::prelude::entity::{
    FirstName, LastName, PasswordHash, Role, ShippingAddress, User, UserEmail, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresConnection;
use crate::error::{on_conflict, ConvertError};

pub struct PostgresUserRepository;

#[async_trait::async_trait]
impl UserQuery for PostgresUserRepository {
    type Transaction = PostgresConnection;

    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        PgUserInternal::find_by_id(con, id).await
    }

    async fn find_by_email(
        &self,
        con: &mut PostgresConnection,
        email: &UserEmail,
    ) -> error_stack::Result<Option<User>, KernelError> {
        PgUserInternal::find_by_email(con, email).await
    }
}

#[async_trait::async_trait]
impl UserModifier for PostgresUserRepository {
    type Transaction = PostgresConnection;

    async fn create(
        &self,
        con: &mut PostgresConnection,
        user: &User,
    ) -> error_stack::Result<(), KernelError> {
        PgUserInternal::create(con, user).await
    }
}

// language=postgresql
const SELECT_USERS: &str = r#"
    SELECT u.id, u.email, u.password, u.first_name, u.last_name, u.shipping_address,
           COALESCE(ARRAY_AGG(r.role::TEXT) FILTER (WHERE r.role IS NOT NULL), '{}') AS roles
    FROM users u
    LEFT JOIN user_roles r ON r.user_id = u.id
    "#;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password: String,
    first_name: String,
    last_name: String,
    shipping_address: Option<String>,
    roles: Vec<String>,
}

impl TryFrom<UserRow> for User {
    type Error = Report<KernelError>;
    fn try_from(value: UserRow) -> Result<Self, Self::Error> {
        let roles = value
            .roles
            .iter()
            .map(|role| role.parse::<Role>())
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(User::new(
            UserId::new(value.id),
            UserEmail::new(value.email),
            PasswordHash::new(value.password),
            FirstName::new(value.first_name),
            LastName::new(value.last_name),
            value.shipping_address.map(ShippingAddress::new),
            roles,
        ))
    }
}

pub(in crate::database) struct PgUserInternal;

impl PgUserInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "{SELECT_USERS} WHERE u.id = $1 GROUP BY u.id"
        ))
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(User::try_from).transpose()
    }

    async fn find_by_email(
        con: &mut PgConnection,
        email: &UserEmail,
    ) -> error_stack::Result<Option<User>, KernelError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "{SELECT_USERS} WHERE u.email = $1 GROUP BY u.id"
        ))
        .bind(email.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(User::try_from).transpose()
    }

    async fn create(con: &mut PgConnection, user: &User) -> error_stack::Result<(), KernelError> {
        let inserted = sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO users (id, email, password, first_name, last_name, shipping_address)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id().as_ref())
        .bind(user.email().as_ref())
        .bind(AsRef::<String>::as_ref(user.password()))
        .bind(user.first_name().as_ref())
        .bind(user.last_name().as_ref())
        .bind(user.shipping_address().as_ref().map(AsRef::<String>::as_ref))
        .execute(&mut *con)
        .await
        .convert_error();
        on_conflict(inserted, || {
            format!("User with email {} already exists", user.email().as_ref())
        })?;

        let roles = user
            .roles()
            .iter()
            .map(|role| role.as_str().to_string())
            .collect::<Vec<_>>();
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO user_roles (user_id, role)
            SELECT $1, UNNEST($2::TEXT[])
            "#,
        )
        .bind(user.id().as_ref())
        .bind(roles)
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}
