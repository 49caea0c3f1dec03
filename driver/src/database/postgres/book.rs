use rust_decimal::Decimal;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use kernel::interface::query::BookQuery;
use kernel::interface::specification::{BookFilter, Operator};
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{
    Book, BookAuthor, BookDescription, BookId, BookPrice, BookSortKey, BookTitle, CategoryId,
    CoverImage, IsDeleted, Isbn, Page, Pagination,
};
use kernel::KernelError;

use crate::database::postgres::PostgresConnection;
use crate::error::{on_conflict, ConvertError};

pub struct PostgresBookRepository;

#[async_trait::async_trait]
impl BookQuery for PostgresBookRepository {
    type Transaction = PostgresConnection;

    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_id(con, id).await
    }

    async fn find_page(
        &self,
        con: &mut PostgresConnection,
        filter: &BookFilter,
        pagination: &Pagination<BookSortKey>,
    ) -> error_stack::Result<Page<Book>, KernelError> {
        PgBookInternal::find_page(con, Scope::Filter(filter), pagination).await
    }

    async fn find_by_category_id(
        &self,
        con: &mut PostgresConnection,
        category_id: &CategoryId,
        pagination: &Pagination<BookSortKey>,
    ) -> error_stack::Result<Page<Book>, KernelError> {
        PgBookInternal::find_page(con, Scope::Category(category_id), pagination).await
    }
}

#[async_trait::async_trait]
impl BookModifier for PostgresBookRepository {
    type Transaction = PostgresConnection;

    async fn create(
        &self,
        con: &mut PostgresConnection,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::create(con, book).await
    }

    async fn update(
        &self,
        con: &mut PostgresConnection,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::update(con, book).await
    }

    async fn delete(
        &self,
        con: &mut PostgresConnection,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::delete(con, book_id).await
    }
}

// language=postgresql
const SELECT_BOOKS: &str = r#"
    SELECT b.id, b.title, b.author, b.isbn, b.price, b.description, b.cover_image, b.is_deleted,
           COALESCE(ARRAY_AGG(bc.category_id) FILTER (WHERE bc.category_id IS NOT NULL), '{}') AS category_ids
    FROM books b
    LEFT JOIN books_categories bc ON bc.book_id = b.id
    "#;

#[derive(sqlx::FromRow)]
pub(in crate::database::postgres) struct BookRow {
    id: Uuid,
    title: String,
    author: String,
    isbn: String,
    price: Decimal,
    description: Option<String>,
    cover_image: Option<String>,
    is_deleted: bool,
    category_ids: Vec<Uuid>,
}

impl From<BookRow> for Book {
    fn from(value: BookRow) -> Self {
        Book::new(
            BookId::new(value.id),
            BookTitle::new(value.title),
            BookAuthor::new(value.author),
            Isbn::new(value.isbn),
            BookPrice::new(value.price),
            value.description.map(BookDescription::new),
            value.cover_image.map(CoverImage::new),
            value.category_ids.into_iter().map(CategoryId::new).collect(),
            IsDeleted::new(value.is_deleted),
        )
    }
}

/// Which books a listing covers. Pushed as extra `AND` conditions.
enum Scope<'a> {
    Filter(&'a BookFilter),
    Category(&'a CategoryId),
}

impl Scope<'_> {
    fn push_conditions(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Scope::Filter(filter) => {
                for predicate in filter.predicates() {
                    let column = predicate.field().column();
                    let value = predicate.value().to_string();
                    match predicate.operator() {
                        Operator::Equal => {
                            builder.push(format!(" AND b.{column} = ")).push_bind(value);
                        }
                        Operator::ContainsIgnoreCase => {
                            builder
                                .push(" AND POSITION(LOWER(")
                                .push_bind(value)
                                .push(format!(") IN LOWER(b.{column})) > 0"));
                        }
                    }
                }
            }
            Scope::Category(category_id) => {
                builder
                    .push(" AND EXISTS (SELECT 1 FROM books_categories f WHERE f.book_id = b.id AND f.category_id = ")
                    .push_bind(*category_id.as_ref())
                    .push(")");
            }
        }
    }
}

fn sort_column(key: BookSortKey) -> &'static str {
    match key {
        BookSortKey::Title => "title",
        BookSortKey::Author => "author",
        BookSortKey::Isbn => "isbn",
        BookSortKey::Price => "price",
    }
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let mut query = QueryBuilder::<Postgres>::new(SELECT_BOOKS);
        query
            .push(" WHERE b.is_deleted = FALSE AND b.id = ")
            .push_bind(*id.as_ref())
            .push(" GROUP BY b.id");
        let row = query
            .build_query_as::<BookRow>()
            .fetch_optional(con)
            .await
            .convert_error()?;
        Ok(row.map(Book::from))
    }

    async fn find_page(
        con: &mut PgConnection,
        scope: Scope<'_>,
        pagination: &Pagination<BookSortKey>,
    ) -> error_stack::Result<Page<Book>, KernelError> {
        // language=postgresql
        let mut count =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM books b WHERE b.is_deleted = FALSE");
        scope.push_conditions(&mut count);
        let (total,) = count
            .build_query_as::<(i64,)>()
            .fetch_one(&mut *con)
            .await
            .convert_error()?;

        let sort = pagination.sort();
        let column = sort_column(sort.key());
        let direction = sort.direction().as_sql();
        let mut select = QueryBuilder::<Postgres>::new(SELECT_BOOKS);
        select.push(" WHERE b.is_deleted = FALSE");
        scope.push_conditions(&mut select);
        select
            .push(format!(
                " GROUP BY b.id ORDER BY b.{column} {direction}, b.id {direction} LIMIT "
            ))
            .push_bind(i64::from(i32::from(pagination.limit())))
            .push(" OFFSET ")
            .push_bind(i64::from(i32::from(pagination.offset())));
        let rows = select
            .build_query_as::<BookRow>()
            .fetch_all(&mut *con)
            .await
            .convert_error()?;

        Ok(Page::new(
            rows.into_iter().map(Book::from).collect(),
            total,
            pagination.limit(),
            pagination.offset(),
        ))
    }

    async fn create(con: &mut PgConnection, book: &Book) -> error_stack::Result<(), KernelError> {
        let inserted = sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO books (id, title, author, isbn, price, description, cover_image, is_deleted)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(book.id().as_ref())
        .bind(book.title().as_ref())
        .bind(book.author().as_ref())
        .bind(book.isbn().as_ref())
        .bind(book.price().as_ref())
        .bind(book.description().as_ref().map(AsRef::<String>::as_ref))
        .bind(book.cover_image().as_ref().map(AsRef::<String>::as_ref))
        .bind(book.is_deleted().as_ref())
        .execute(&mut *con)
        .await
        .convert_error();
        on_conflict(inserted, || isbn_taken(book))?;
        Self::insert_categories(con, book).await
    }

    async fn update(con: &mut PgConnection, book: &Book) -> error_stack::Result<(), KernelError> {
        let updated = sqlx::query(
            // language=postgresql
            r#"
            UPDATE books
            SET title = $2, author = $3, isbn = $4, price = $5, description = $6, cover_image = $7
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(book.id().as_ref())
        .bind(book.title().as_ref())
        .bind(book.author().as_ref())
        .bind(book.isbn().as_ref())
        .bind(book.price().as_ref())
        .bind(book.description().as_ref().map(AsRef::<String>::as_ref))
        .bind(book.cover_image().as_ref().map(AsRef::<String>::as_ref))
        .execute(&mut *con)
        .await
        .convert_error();
        on_conflict(updated, || isbn_taken(book))?;

        // language=postgresql
        sqlx::query("DELETE FROM books_categories WHERE book_id = $1")
            .bind(book.id().as_ref())
            .execute(&mut *con)
            .await
            .convert_error()?;
        Self::insert_categories(con, book).await
    }

    async fn delete(con: &mut PgConnection, book_id: &BookId) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query("UPDATE books SET is_deleted = TRUE WHERE id = $1")
            .bind(book_id.as_ref())
            .execute(con)
            .await
            .convert_error()?;
        Ok(())
    }

    async fn insert_categories(
        con: &mut PgConnection,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        if book.category_ids().is_empty() {
            return Ok(());
        }
        let category_ids = book
            .category_ids()
            .iter()
            .map(|id| *id.as_ref())
            .collect::<Vec<Uuid>>();
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO books_categories (book_id, category_id)
            SELECT $1, UNNEST($2::UUID[])
            "#,
        )
        .bind(book.id().as_ref())
        .bind(category_ids)
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

fn isbn_taken(book: &Book) -> String {
    format!("Book with isbn {} already exists", book.isbn().as_ref())
}
