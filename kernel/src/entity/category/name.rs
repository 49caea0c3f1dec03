use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct CategoryName(String);

impl CategoryName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}
