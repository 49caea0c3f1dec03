mod email;
mod id;
mod name;
mod password;
mod role;

pub use self::{email::*, id::*, name::*, password::*, role::*};
use crate::entity::ShippingAddress;
use destructure::Destructure;
use std::collections::BTreeSet;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, Destructure, References)]
pub struct User {
    id: UserId,
    email: UserEmail,
    password: PasswordHash,
    first_name: FirstName,
    last_name: LastName,
    shipping_address: Option<ShippingAddress>,
    roles: BTreeSet<Role>,
}

impl User {
    pub fn new(
        id: UserId,
        email: UserEmail,
        password: PasswordHash,
        first_name: FirstName,
        last_name: LastName,
        shipping_address: Option<ShippingAddress>,
        roles: BTreeSet<Role>,
    ) -> Self {
        Self {
            id,
            email,
            password,
            first_name,
            last_name,
            shipping_address,
            roles,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}
