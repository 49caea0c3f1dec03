pub use crate::error::*;

mod database;
mod entity;
mod error;
mod modify;
mod query;
mod security;
mod specification;

#[cfg(feature = "prelude")]
pub mod prelude {
    pub mod entity {
        pub use crate::entity::*;
    }
}

#[cfg(feature = "interface")]
pub mod interface {
    pub mod database {
        pub use crate::database::*;
    }
    pub mod query {
        pub use crate::query::*;
    }
    pub mod update {
        pub use crate::modify::*;
    }
    pub mod security {
        pub use crate::security::*;
    }
    pub mod specification {
        pub use crate::specification::*;
    }
}
