use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vodca::{AsRefln, Fromln};

#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize, Fromln, AsRefln,
)]
pub struct CategoryId(Uuid);

impl CategoryId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }
}
