use std::collections::BTreeSet;

use tracing::{debug, info};
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{DependOnUserQuery, UserQuery};
use kernel::interface::security::{DependOnPasswordHasher, PasswordHasher};
use kernel::interface::update::{
    DependOnShoppingCartModifier, DependOnUserModifier, ShoppingCartModifier, UserModifier,
};
use kernel::prelude::entity::{
    FirstName, LastName, Role, ShippingAddress, ShoppingCart, ShoppingCartId, User, UserEmail,
    UserId,
};
use kernel::KernelError;

use crate::transfer::{AuthenticateUserDto, RegisterUserDto, UserDto};

#[async_trait::async_trait]
pub trait RegisterUserService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnUserQuery
    + DependOnUserModifier
    + DependOnShoppingCartModifier
    + DependOnPasswordHasher
{
    /// Creates the user with the `USER` role together with an empty cart.
    async fn register(&self, dto: RegisterUserDto) -> error_stack::Result<UserDto, KernelError> {
        dto.validate()?;
        let email = UserEmail::new(dto.email);
        let mut con = self.database_connection().transact().await?;

        if self
            .user_query()
            .find_by_email(&mut con, &email)
            .await?
            .is_some()
        {
            return Err(KernelError::Conflict.with_message(format!(
                "Can't register user: email {} is already taken",
                email.as_ref()
            )));
        }

        let password = self.password_hasher().hash(&dto.password)?;
        let user = User::new(
            UserId::new(Uuid::new_v4()),
            email,
            password,
            FirstName::new(dto.first_name.trim()),
            LastName::new(dto.last_name.trim()),
            dto.shipping_address
                .filter(|address| !address.trim().is_empty())
                .map(ShippingAddress::new),
            BTreeSet::from([Role::User]),
        );
        self.user_modifier().create(&mut con, &user).await?;

        let cart = ShoppingCart::empty(ShoppingCartId::new(Uuid::new_v4()), *user.id());
        self.shopping_cart_modifier().create(&mut con, &cart).await?;
        con.commit().await?;

        info!("Registered user: {}", user.id().as_ref());
        Ok(UserDto::from(user))
    }
}

impl<T> RegisterUserService for T where
    T: DependOnUserQuery + DependOnUserModifier + DependOnShoppingCartModifier + DependOnPasswordHasher
{
}

#[async_trait::async_trait]
pub trait AuthenticateUserService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnUserQuery + DependOnPasswordHasher
{
    /// Unknown e-mail and wrong password fail the same way.
    async fn authenticate(
        &self,
        dto: AuthenticateUserDto,
    ) -> error_stack::Result<UserDto, KernelError> {
        let rejected = || KernelError::Unauthorized.with_message("Invalid email or password");
        let mut con = self.database_connection().transact().await?;

        let Some(user) = self
            .user_query()
            .find_by_email(&mut con, &UserEmail::new(dto.email))
            .await?
        else {
            return Err(rejected());
        };
        if !self.password_hasher().verify(&dto.password, user.password())? {
            debug!("Password mismatch for user: {}", user.id().as_ref());
            return Err(rejected());
        }

        Ok(UserDto::from(user))
    }
}

impl<T> AuthenticateUserService for T where T: DependOnUserQuery + DependOnPasswordHasher {}

#[cfg(test)]
mod test {
    use driver::database::InMemoryDatabase;
    use kernel::KernelError;

    use crate::service::{AuthenticateUserService, RegisterUserService, ShoppingCartService};
    use crate::transfer::{AuthenticateUserDto, GetCartDto, RegisterUserDto};

    fn registration(email: &str) -> RegisterUserDto {
        RegisterUserDto {
            email: email.into(),
            password: "secret-password".into(),
            repeat_password: "secret-password".into(),
            first_name: "Jay".into(),
            last_name: "Gatsby".into(),
            shipping_address: Some("West Egg".into()),
        }
    }

    #[tokio::test]
    async fn registration_creates_user_and_cart() {
        let db = InMemoryDatabase::new();
        let user = db.register(registration("Jay@Example.com")).await.unwrap();

        assert_eq!(user.email, "jay@example.com");
        assert_eq!(user.roles, vec!["USER".to_string()]);
        let cart = db.get_cart(GetCartDto { user_id: user.id }).await.unwrap();
        assert!(cart.items.is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let db = InMemoryDatabase::new();
        db.register(registration("jay@example.com")).await.unwrap();
        let error = db
            .register(registration("JAY@example.com"))
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Conflict);
    }

    #[tokio::test]
    async fn registration_is_validated() {
        let db = InMemoryDatabase::new();
        let error = db
            .register(RegisterUserDto {
                repeat_password: "another-password".into(),
                ..registration("jay@example.com")
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Validation);

        let error = db
            .register(RegisterUserDto {
                password: "short".into(),
                repeat_password: "short".into(),
                ..registration("not-an-email")
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Validation);
    }

    #[tokio::test]
    async fn authentication() {
        let db = InMemoryDatabase::new();
        let user = db.register(registration("jay@example.com")).await.unwrap();

        let authenticated = db
            .authenticate(AuthenticateUserDto {
                email: "jay@example.com".into(),
                password: "secret-password".into(),
            })
            .await
            .unwrap();
        assert_eq!(authenticated, user);

        for (email, password) in [
            ("jay@example.com", "wrong-password"),
            ("daisy@example.com", "secret-password"),
        ] {
            let error = db
                .authenticate(AuthenticateUserDto {
                    email: email.into(),
                    password: password.into(),
                })
                .await
                .unwrap_err();
            assert_eq!(error.current_context(), &KernelError::Unauthorized);
        }
    }
}
