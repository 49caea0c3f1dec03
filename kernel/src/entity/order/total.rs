use crate::entity::OrderItem;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct OrderTotal(Decimal);

impl OrderTotal {
    pub fn new(total: impl Into<Decimal>) -> Self {
        Self(total.into())
    }

    pub fn sum(items: &[OrderItem]) -> Self {
        Self(items.iter().map(OrderItem::line_total).sum())
    }
}
