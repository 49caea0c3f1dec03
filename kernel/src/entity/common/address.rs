use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct ShippingAddress(String);

impl ShippingAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }
}
