use std::marker::PhantomData;

/// Optimistic lock counter. A write carrying a stale version is rejected with
/// `KernelError::Concurrency`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version<T>(i64, PhantomData<T>);

impl<T> Version<T> {
    pub fn new(version: impl Into<i64>) -> Self {
        Self(version.into(), PhantomData)
    }

    pub fn initial() -> Self {
        Self::new(0)
    }

    pub fn next(&self) -> Self {
        Self::new(self.0 + 1)
    }
}

impl<T> From<i64> for Version<T> {
    fn from(version: i64) -> Self {
        Self::new(version)
    }
}

impl<T> AsRef<i64> for Version<T> {
    fn as_ref(&self) -> &i64 {
        &self.0
    }
}
