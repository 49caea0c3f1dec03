use std::fmt::{Display, Formatter};

use crate::entity::Book;

/// Book column a predicate applies to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum BookField {
    Title,
    Author,
    Isbn,
    Description,
}

impl BookField {
    pub fn column(&self) -> &'static str {
        match self {
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::Isbn => "isbn",
            BookField::Description => "description",
        }
    }

    fn value<'a>(&self, book: &'a Book) -> Option<&'a str> {
        match self {
            BookField::Title => Some(book.title().as_ref().as_str()),
            BookField::Author => Some(book.author().as_ref().as_str()),
            BookField::Isbn => Some(book.isbn().as_ref().as_str()),
            BookField::Description => book
                .description()
                .as_ref()
                .map(|description| description.as_ref().as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Operator {
    Equal,
    ContainsIgnoreCase,
}

/// Storage-independent condition on a single book field.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Predicate {
    field: BookField,
    operator: Operator,
    value: String,
}

impl Predicate {
    pub fn new(field: BookField, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            field,
            operator,
            value: value.into(),
        }
    }

    pub fn field(&self) -> BookField {
        self.field
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn matches(&self, book: &Book) -> bool {
        let Some(actual) = self.field.value(book) else {
            return false;
        };
        match self.operator {
            Operator::Equal => actual == self.value,
            Operator::ContainsIgnoreCase => actual
                .to_lowercase()
                .contains(&self.value.to_lowercase()),
        }
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let operator = match self.operator {
            Operator::Equal => "=",
            Operator::ContainsIgnoreCase => "~*",
        };
        write!(f, "{} {} {:?}", self.field.column(), operator, self.value)
    }
}

/// Conjunction of predicates. An empty filter matches every book.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct BookFilter {
    predicates: Vec<Predicate>,
}

impl BookFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches(&self, book: &Book) -> bool {
        self.predicates.iter().all(|predicate| predicate.matches(book))
    }
}
