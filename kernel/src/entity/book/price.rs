use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookPrice(Decimal);

impl BookPrice {
    pub fn new(price: impl Into<Decimal>) -> Self {
        Self(price.into())
    }
}
