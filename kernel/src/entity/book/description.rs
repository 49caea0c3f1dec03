use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookDescription(String);

impl BookDescription {
    pub fn new(description: impl Into<String>) -> Self {
        Self(description.into())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct CoverImage(String);

impl CoverImage {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }
}
