use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct ShoppingCartId(Uuid);

impl ShoppingCartId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct CartItemId(Uuid);

impl CartItemId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }
}
