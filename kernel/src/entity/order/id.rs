use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct OrderId(Uuid);

impl OrderId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct OrderItemId(Uuid);

impl OrderItemId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }
}
