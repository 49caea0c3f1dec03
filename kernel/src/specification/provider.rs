use std::fmt::{Display, Formatter};

use error_stack::Report;

use crate::specification::{BookField, Operator, Predicate};
use crate::KernelError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum SearchKey {
    Author,
    TitlePart,
    Isbn,
    DescriptionPart,
}

impl Display for SearchKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SearchKey::Author => "author",
            SearchKey::TitlePart => "title",
            SearchKey::Isbn => "isbn",
            SearchKey::DescriptionPart => "description",
        })
    }
}

pub trait SpecificationProvider: 'static + Sync + Send {
    fn key(&self) -> SearchKey;
    fn specification(&self, param: &str) -> Predicate;
}

pub struct AuthorSpecificationProvider;

impl SpecificationProvider for AuthorSpecificationProvider {
    fn key(&self) -> SearchKey {
        SearchKey::Author
    }

    fn specification(&self, param: &str) -> Predicate {
        Predicate::new(BookField::Author, Operator::Equal, param)
    }
}

pub struct TitlePartSpecificationProvider;

impl SpecificationProvider for TitlePartSpecificationProvider {
    fn key(&self) -> SearchKey {
        SearchKey::TitlePart
    }

    fn specification(&self, param: &str) -> Predicate {
        Predicate::new(BookField::Title, Operator::ContainsIgnoreCase, param)
    }
}

pub struct IsbnSpecificationProvider;

impl SpecificationProvider for IsbnSpecificationProvider {
    fn key(&self) -> SearchKey {
        SearchKey::Isbn
    }

    fn specification(&self, param: &str) -> Predicate {
        Predicate::new(BookField::Isbn, Operator::Equal, param)
    }
}

pub struct DescriptionPartSpecificationProvider;

impl SpecificationProvider for DescriptionPartSpecificationProvider {
    fn key(&self) -> SearchKey {
        SearchKey::DescriptionPart
    }

    fn specification(&self, param: &str) -> Predicate {
        Predicate::new(BookField::Description, Operator::ContainsIgnoreCase, param)
    }
}

pub struct BookSpecificationRegistry {
    providers: Vec<Box<dyn SpecificationProvider>>,
}

impl BookSpecificationRegistry {
    pub fn new(providers: Vec<Box<dyn SpecificationProvider>>) -> Self {
        Self { providers }
    }

    pub fn provider(
        &self,
        key: SearchKey,
    ) -> error_stack::Result<&dyn SpecificationProvider, KernelError> {
        self.providers
            .iter()
            .find(|provider| provider.key() == key)
            .map(|provider| &**provider)
            .ok_or_else(|| {
                Report::new(KernelError::Configuration)
                    .attach_printable(format!("Can't find SpecificationProvider for key: {key}"))
            })
    }
}

impl Default for BookSpecificationRegistry {
    fn default() -> Self {
        Self::new(vec![
            Box::new(AuthorSpecificationProvider),
            Box::new(TitlePartSpecificationProvider),
            Box::new(IsbnSpecificationProvider),
            Box::new(DescriptionPartSpecificationProvider),
        ])
    }
}

impl std::fmt::Debug for BookSpecificationRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|provider| provider.key()))
            .finish()
    }
}
