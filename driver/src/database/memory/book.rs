use std::cmp::Ordering;

use kernel::interface::query::BookQuery;
use kernel::interface::specification::BookFilter;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{
    Book, BookId, BookSortKey, CategoryId, IsDeleted, Page, Pagination, SortDirection,
};
use kernel::KernelError;

use crate::database::memory::{InMemoryTransaction, Store};

pub struct InMemoryBookRepository;

#[async_trait::async_trait]
impl BookQuery for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        Ok(con.store().active_book(id).cloned())
    }

    async fn find_page(
        &self,
        con: &mut InMemoryTransaction,
        filter: &BookFilter,
        pagination: &Pagination<BookSortKey>,
    ) -> error_stack::Result<Page<Book>, KernelError> {
        let books = con
            .store()
            .books
            .values()
            .filter(|book| !book.is_deleted().as_ref())
            .filter(|book| filter.matches(book));
        Ok(sorted_page(books, pagination))
    }

    async fn find_by_category_id(
        &self,
        con: &mut InMemoryTransaction,
        category_id: &CategoryId,
        pagination: &Pagination<BookSortKey>,
    ) -> error_stack::Result<Page<Book>, KernelError> {
        let books = con
            .store()
            .books
            .values()
            .filter(|book| !book.is_deleted().as_ref())
            .filter(|book| book.category_ids().contains(category_id));
        Ok(sorted_page(books, pagination))
    }
}

#[async_trait::async_trait]
impl BookModifier for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        let store = con.store();
        store.ensure_isbn_free(book)?;
        store.books.insert(*book.id(), book.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        let store = con.store();
        store.ensure_isbn_free(book)?;
        if let Some(stored) = store.books.get_mut(book.id()) {
            if !stored.is_deleted().as_ref() {
                *stored = book.clone();
            }
        }
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        if let Some(book) = con.store().books.get_mut(book_id) {
            book.substitute(|book| *book.is_deleted = IsDeleted::new(true));
        }
        Ok(())
    }
}

impl Store {
    pub(in crate::database::memory) fn active_book(&self, id: &BookId) -> Option<&Book> {
        self.books.get(id).filter(|book| !book.is_deleted().as_ref())
    }

    /// ISBNs stay reserved by soft-deleted books, as with a unique column.
    fn ensure_isbn_free(&self, book: &Book) -> error_stack::Result<(), KernelError> {
        let taken = self
            .books
            .values()
            .any(|other| other.id() != book.id() && other.isbn() == book.isbn());
        if taken {
            return Err(KernelError::Conflict.with_message(format!(
                "Book with isbn {} already exists",
                book.isbn().as_ref()
            )));
        }
        Ok(())
    }
}

fn compare(key: BookSortKey, a: &Book, b: &Book) -> Ordering {
    match key {
        BookSortKey::Title => a.title().as_ref().cmp(b.title().as_ref()),
        BookSortKey::Author => a.author().as_ref().cmp(b.author().as_ref()),
        BookSortKey::Isbn => a.isbn().as_ref().cmp(b.isbn().as_ref()),
        BookSortKey::Price => a.price().as_ref().cmp(b.price().as_ref()),
    }
}

fn sorted_page<'a>(
    books: impl Iterator<Item = &'a Book>,
    pagination: &Pagination<BookSortKey>,
) -> Page<Book> {
    let sort = pagination.sort();
    let mut books = books.cloned().collect::<Vec<_>>();
    books.sort_by(|a, b| {
        let ordering = compare(sort.key(), a, b).then_with(|| a.id().cmp(b.id()));
        match sort.direction() {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    let total = i64::try_from(books.len()).unwrap_or(i64::MAX);
    Page::new(
        pagination.window(books),
        total,
        pagination.limit(),
        pagination.offset(),
    )
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use rust_decimal::Decimal;
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::BookQuery;
    use kernel::interface::specification::{BookField, BookFilter, Operator, Predicate};
    use kernel::interface::update::BookModifier;
    use kernel::prelude::entity::{
        Book, BookAuthor, BookId, BookPrice, BookSortKey, BookTitle, CategoryId, IsDeleted, Isbn,
        Pagination, SelectLimit, SelectOffset, Sort, SortDirection,
    };
    use kernel::KernelError;

    use crate::database::{InMemoryBookRepository, InMemoryDatabase};

    fn book(title: &str, isbn: &str, price: i64, category: Option<CategoryId>) -> Book {
        Book::new(
            BookId::new(Uuid::new_v4()),
            BookTitle::new(title),
            BookAuthor::new("Author"),
            Isbn::new(isbn),
            BookPrice::new(Decimal::new(price, 2)),
            None,
            None,
            category.into_iter().collect::<BTreeSet<_>>(),
            IsDeleted::active(),
        )
    }

    #[tokio::test]
    async fn pages_are_filtered_sorted_and_windowed() {
        let db = InMemoryDatabase::new();
        let mut con = db.transact().await.unwrap();
        let category = CategoryId::new(Uuid::new_v4());
        let books = [
            book("Alpha", "1", 300, Some(category)),
            book("Beta", "2", 100, None),
            book("Gamma", "3", 200, Some(category)),
        ];
        for book in &books {
            InMemoryBookRepository.create(&mut con, book).await.unwrap();
        }
        InMemoryBookRepository
            .delete(&mut con, books[2].id())
            .await
            .unwrap();

        let by_price = Pagination::new(
            SelectLimit::new(1),
            SelectOffset::new(0),
            Sort::new(BookSortKey::Price, SortDirection::Desc),
        );
        let page = InMemoryBookRepository
            .find_page(&mut con, &BookFilter::all(), &by_price)
            .await
            .unwrap();
        assert_eq!(page.total(), 2);
        assert_eq!(page.items(), &[books[0].clone()]);

        let filter =
            BookFilter::all().and(Predicate::new(BookField::Title, Operator::ContainsIgnoreCase, "ET"));
        let page = InMemoryBookRepository
            .find_page(&mut con, &filter, &Pagination::default())
            .await
            .unwrap();
        assert_eq!(page.items(), &[books[1].clone()]);

        let page = InMemoryBookRepository
            .find_by_category_id(&mut con, &category, &Pagination::default())
            .await
            .unwrap();
        assert_eq!(page.items(), &[books[0].clone()]);
    }

    #[tokio::test]
    async fn isbn_stays_unique() {
        let db = InMemoryDatabase::new();
        let mut con = db.transact().await.unwrap();
        let first = book("Alpha", "1", 100, None);
        InMemoryBookRepository.create(&mut con, &first).await.unwrap();
        InMemoryBookRepository
            .delete(&mut con, first.id())
            .await
            .unwrap();

        let error = InMemoryBookRepository
            .create(&mut con, &book("Beta", "1", 100, None))
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Conflict);
    }
}
