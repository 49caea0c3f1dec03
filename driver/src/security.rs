use error_stack::Report;
use rand::Rng;

use kernel::interface::security::PasswordHasher;
use kernel::prelude::entity::PasswordHash;
use kernel::KernelError;

use crate::error::ConvertError;

/// Argon2 with a random 16 byte salt per password, stored as a PHC string.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> error_stack::Result<PasswordHash, KernelError> {
        let salt: [u8; 16] = rand::thread_rng().gen();
        let encoded = argon2::hash_encoded(password.as_bytes(), &salt, &argon2::Config::default())
            .convert_error()?;
        Ok(PasswordHash::new(encoded))
    }

    fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> error_stack::Result<bool, KernelError> {
        let encoded: &String = hash.as_ref();
        argon2::verify_encoded(encoded, password.as_bytes()).convert_error()
    }
}

impl<T: 'static + Sync + Send> ConvertError for Result<T, argon2::Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| Report::new(error).change_context(KernelError::Internal))
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::security::PasswordHasher;
    use kernel::prelude::entity::PasswordHash;

    use super::Argon2PasswordHasher;

    #[test]
    fn verifies_only_the_original_password() {
        let hasher = Argon2PasswordHasher;
        let hash = hasher.hash("secret-password").unwrap();

        assert_ne!(hash, PasswordHash::new("secret-password"));
        assert!(hasher.verify("secret-password", &hash).unwrap());
        assert!(!hasher.verify("other-password", &hash).unwrap());
    }

    #[test]
    fn salts_differ_between_hashes() {
        let hasher = Argon2PasswordHasher;
        let first = hasher.hash("secret-password").unwrap();
        let second = hasher.hash("secret-password").unwrap();
        assert_ne!(first, second);
    }
}
