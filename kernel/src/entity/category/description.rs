use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct CategoryDescription(String);

impl CategoryDescription {
    pub fn new(description: impl Into<String>) -> Self {
        Self(description.into())
    }
}
