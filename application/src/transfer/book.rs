use rust_decimal::Decimal;
use uuid::Uuid;

use kernel::prelude::entity::{Book, DestructBook};
use kernel::KernelError;

use crate::transfer::PageRequestDto;
use crate::validation::Validator;

const DESCRIPTION_MAX_CHARS: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct BookDto {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub category_ids: Vec<Uuid>,
}

impl From<Book> for BookDto {
    fn from(value: Book) -> Self {
        let DestructBook {
            id,
            title,
            author,
            isbn,
            price,
            description,
            cover_image,
            category_ids,
            ..
        } = value.into_destruct();
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            price: price.into(),
            description: description.map(Into::into),
            cover_image: cover_image.map(Into::into),
            category_ids: category_ids.into_iter().map(Into::into).collect(),
        }
    }
}

pub struct GetBookDto {
    pub id: Uuid,
}

pub struct GetAllBookDto {
    pub page: PageRequestDto,
}

#[derive(Debug, Clone, Default)]
pub struct SearchBookDto {
    pub title_part: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub description_part: Option<String>,
    pub page: PageRequestDto,
}

pub struct GetBooksByCategoryDto {
    pub category_id: Uuid,
    pub page: PageRequestDto,
}

#[derive(Debug, Clone)]
pub struct CreateBookDto {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub category_ids: Vec<Uuid>,
}

impl CreateBookDto {
    pub fn validate(&self) -> error_stack::Result<(), KernelError> {
        let mut validator = Validator::new();
        validator
            .not_blank("title", &self.title, "Title is required. Please provide a title.")
            .not_blank("author", &self.author, "Author is required. Please provide an author.")
            .not_blank("isbn", &self.isbn, "ISBN is required. Please provide a valid ISBN number.")
            .price("price", &self.price);
        if let Some(description) = &self.description {
            validator.max_chars(
                "description",
                description,
                DESCRIPTION_MAX_CHARS,
                "Description must be less than 1000 characters",
            );
        }
        if let Some(cover_image) = &self.cover_image {
            validator.url(
                "coverImage",
                cover_image,
                "Invalid cover image URL. Please provide a valid URL.",
            );
        }
        validator.finish()
    }
}

/// Absent fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateBookDto {
    pub id: Uuid,
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub category_ids: Option<Vec<Uuid>>,
}

impl UpdateBookDto {
    pub fn validate(&self) -> error_stack::Result<(), KernelError> {
        let mut validator = Validator::new();
        if let Some(title) = &self.title {
            validator.not_blank("title", title, "Title must not be blank");
        }
        if let Some(author) = &self.author {
            validator.not_blank("author", author, "Author must not be blank");
        }
        if let Some(isbn) = &self.isbn {
            validator.not_blank("isbn", isbn, "ISBN must not be blank");
        }
        if let Some(price) = &self.price {
            validator.price("price", price);
        }
        if let Some(description) = &self.description {
            validator.max_chars(
                "description",
                description,
                DESCRIPTION_MAX_CHARS,
                "Description must be less than 1000 characters",
            );
        }
        if let Some(cover_image) = &self.cover_image {
            validator.url(
                "coverImage",
                cover_image,
                "Invalid cover image URL. Please provide a valid URL.",
            );
        }
        validator.finish()
    }
}

pub struct DeleteBookDto {
    pub id: Uuid,
}
