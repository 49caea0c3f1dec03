mod author;
mod description;
mod id;
mod isbn;
mod price;
mod title;

pub use self::{author::*, description::*, id::*, isbn::*, price::*, title::*};
use crate::entity::{CategoryId, IsDeleted, SortKey};
use destructure::{Destructure, Mutation};
use std::collections::BTreeSet;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Book {
    id: BookId,
    title: BookTitle,
    author: BookAuthor,
    isbn: Isbn,
    price: BookPrice,
    description: Option<BookDescription>,
    cover_image: Option<CoverImage>,
    category_ids: BTreeSet<CategoryId>,
    is_deleted: IsDeleted<Book>,
}

impl Book {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: BookId,
        title: BookTitle,
        author: BookAuthor,
        isbn: Isbn,
        price: BookPrice,
        description: Option<BookDescription>,
        cover_image: Option<CoverImage>,
        category_ids: BTreeSet<CategoryId>,
        is_deleted: IsDeleted<Book>,
    ) -> Self {
        Self {
            id,
            title,
            author,
            isbn,
            price,
            description,
            cover_image,
            category_ids,
            is_deleted,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BookSortKey {
    #[default]
    Title,
    Author,
    Isbn,
    Price,
}

impl SortKey for BookSortKey {
    fn parse(key: &str) -> Option<Self> {
        match key {
            "title" => Some(BookSortKey::Title),
            "author" => Some(BookSortKey::Author),
            "isbn" => Some(BookSortKey::Isbn),
            "price" => Some(BookSortKey::Price),
            _ => None,
        }
    }
}
