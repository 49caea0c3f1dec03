use crate::entity::PasswordHash;
use crate::KernelError;

pub trait PasswordHasher: 'static + Sync + Send {
    fn hash(&self, password: &str) -> error_stack::Result<PasswordHash, KernelError>;
    fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> error_stack::Result<bool, KernelError>;
}

pub trait DependOnPasswordHasher: 'static + Sync + Send {
    type PasswordHasher: PasswordHasher;
    fn password_hasher(&self) -> &Self::PasswordHasher;
}
