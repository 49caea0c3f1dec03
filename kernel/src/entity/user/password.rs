use vodca::{AsRefln, Fromln};

/// Encoded password hash (PHC string). Never the plain password.
#[derive(Clone, PartialEq, Eq, Fromln, AsRefln)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}
