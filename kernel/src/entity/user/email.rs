use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct UserEmail(String);

impl UserEmail {
    /// E-mail addresses compare case-insensitively, so they are stored lowercased.
    pub fn new(email: impl Into<String>) -> Self {
        Self(email.into().trim().to_lowercase())
    }
}
