use crate::specification::{BookFilter, BookSpecificationRegistry, SearchKey};
use crate::KernelError;

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct BookSearchParameters {
    pub title_part: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub description_part: Option<String>,
}

pub struct BookSpecificationBuilder<'a> {
    registry: &'a BookSpecificationRegistry,
}

impl<'a> BookSpecificationBuilder<'a> {
    pub fn new(registry: &'a BookSpecificationRegistry) -> Self {
        Self { registry }
    }

    /// Absent and empty parameters contribute nothing; no parameters yields a
    /// match-all filter.
    pub fn build(
        &self,
        params: &BookSearchParameters,
    ) -> error_stack::Result<BookFilter, KernelError> {
        [
            (SearchKey::TitlePart, &params.title_part),
            (SearchKey::Author, &params.author),
            (SearchKey::Isbn, &params.isbn),
            (SearchKey::DescriptionPart, &params.description_part),
        ]
        .into_iter()
        .filter_map(|(key, param)| {
            param
                .as_deref()
                .filter(|value| !value.is_empty())
                .map(|value| (key, value))
        })
        .try_fold(
            BookFilter::all(),
            |filter, (key, value)| -> error_stack::Result<BookFilter, KernelError> {
                let provider = self.registry.provider(key)?;
                Ok(filter.and(provider.specification(value)))
            },
        )
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::entity::{
        Book, BookAuthor, BookDescription, BookId, BookPrice, BookTitle, IsDeleted, Isbn,
    };
    use crate::specification::{
        AuthorSpecificationProvider, BookField, BookSearchParameters, BookSpecificationBuilder,
        BookSpecificationRegistry, Operator, Predicate, TitlePartSpecificationProvider,
    };
    use crate::KernelError;

    fn gatsby() -> Book {
        Book::new(
            BookId::new(Uuid::new_v4()),
            BookTitle::new("The Great Gatsby"),
            BookAuthor::new("F. Scott Fitzgerald"),
            Isbn::new("9780743273565"),
            BookPrice::new(Decimal::new(1099, 2)),
            Some(BookDescription::new("A novel of the Jazz Age")),
            None,
            BTreeSet::new(),
            IsDeleted::active(),
        )
    }

    #[test]
    fn empty_parameters_match_everything() {
        let registry = BookSpecificationRegistry::default();
        let filter = BookSpecificationBuilder::new(&registry)
            .build(&BookSearchParameters {
                title_part: Some(String::new()),
                ..Default::default()
            })
            .unwrap();
        assert!(filter.is_empty());
        assert!(filter.matches(&gatsby()));
    }

    #[test]
    fn present_parameters_are_combined_with_and() {
        let registry = BookSpecificationRegistry::default();
        let filter = BookSpecificationBuilder::new(&registry)
            .build(&BookSearchParameters {
                title_part: Some("gats".into()),
                isbn: Some("9780743273565".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(
            filter.predicates(),
            &[
                Predicate::new(BookField::Title, Operator::ContainsIgnoreCase, "gats"),
                Predicate::new(BookField::Isbn, Operator::Equal, "9780743273565"),
            ]
        );
        assert!(filter.matches(&gatsby()));

        let filter = BookSpecificationBuilder::new(&registry)
            .build(&BookSearchParameters {
                title_part: Some("gats".into()),
                isbn: Some("0000000000000".into()),
                ..Default::default()
            })
            .unwrap();
        assert!(!filter.matches(&gatsby()));
    }

    #[test]
    fn author_is_exact_and_description_is_substring() {
        let registry = BookSpecificationRegistry::default();
        let builder = BookSpecificationBuilder::new(&registry);
        let partial_author = builder
            .build(&BookSearchParameters {
                author: Some("Fitzgerald".into()),
                ..Default::default()
            })
            .unwrap();
        assert!(!partial_author.matches(&gatsby()));

        let description = builder
            .build(&BookSearchParameters {
                description_part: Some("JAZZ".into()),
                ..Default::default()
            })
            .unwrap();
        assert!(description.matches(&gatsby()));
    }

    #[test]
    fn missing_provider_is_a_configuration_error() {
        let registry = BookSpecificationRegistry::new(vec![
            Box::new(AuthorSpecificationProvider),
            Box::new(TitlePartSpecificationProvider),
        ]);
        let builder = BookSpecificationBuilder::new(&registry);

        assert!(builder
            .build(&BookSearchParameters {
                title_part: Some("gats".into()),
                ..Default::default()
            })
            .is_ok());

        let error = builder
            .build(&BookSearchParameters {
                isbn: Some("9780743273565".into()),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Configuration);
    }
}
