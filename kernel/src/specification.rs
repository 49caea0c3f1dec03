//! Dynamic book search.
//!
//! Each search field has a [`SpecificationProvider`] registered under its
//! [`SearchKey`]. [`BookSpecificationBuilder`] asks the registry for a provider per
//! present parameter and folds the produced [`Predicate`]s into one
//! [`BookFilter`] (logical AND). Storage adapters translate the filter into their
//! own query form.

mod builder;
mod predicate;
mod provider;

pub use self::{builder::*, predicate::*, provider::*};

pub trait DependOnBookSpecificationRegistry: 'static + Sync + Send {
    fn book_specification_registry(&self) -> &BookSpecificationRegistry;
}
