use kernel::interface::query::UserQuery;
use kernel::interface::update::UserModifier;
use kernel::prelude::entity::{User, UserEmail, UserId};
use kernel::KernelError;

use crate::database::memory::InMemoryTransaction;

pub struct InMemoryUserRepository;

#[async_trait::async_trait]
impl UserQuery for InMemoryUserRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        Ok(con.store().users.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        con: &mut InMemoryTransaction,
        email: &UserEmail,
    ) -> error_stack::Result<Option<User>, KernelError> {
        Ok(con
            .store()
            .users
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }
}

#[async_trait::async_trait]
impl UserModifier for InMemoryUserRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        user: &User,
    ) -> error_stack::Result<(), KernelError> {
        let store = con.store();
        if store.users.values().any(|other| other.email() == user.email()) {
            return Err(KernelError::Conflict.with_message(format!(
                "User with email {} already exists",
                user.email().as_ref()
            )));
        }
        store.users.insert(*user.id(), user.clone());
        Ok(())
    }
}
