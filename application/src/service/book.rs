use std::collections::BTreeSet;

use tracing::info;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{BookQuery, CategoryQuery, DependOnBookQuery, DependOnCategoryQuery};
use kernel::interface::specification::{
    BookFilter, BookSearchParameters, BookSpecificationBuilder, DependOnBookSpecificationRegistry,
};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{
    Book, BookAuthor, BookDescription, BookId, BookPrice, BookTitle, CategoryId, CoverImage,
    IsDeleted, Isbn,
};
use kernel::KernelError;

use crate::transfer::{
    BookDto, CreateBookDto, DeleteBookDto, GetAllBookDto, GetBookDto, GetBooksByCategoryDto,
    PageDto, SearchBookDto, UpdateBookDto,
};

async fn ensure_categories_exist<Q: CategoryQuery>(
    query: &Q,
    con: &mut Q::Transaction,
    category_ids: &BTreeSet<CategoryId>,
) -> error_stack::Result<(), KernelError> {
    for category_id in category_ids {
        if query.find_by_id(con, category_id).await?.is_none() {
            return Err(KernelError::NotFound.with_message(format!(
                "Can't find category by id: {}",
                category_id.as_ref()
            )));
        }
    }
    Ok(())
}

fn book_not_found(id: &Uuid) -> error_stack::Report<KernelError> {
    KernelError::NotFound.with_message(format!("Can't find book by id: {id}"))
}

#[async_trait::async_trait]
pub trait GetBookService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnBookQuery
    + DependOnCategoryQuery
    + DependOnBookSpecificationRegistry
{
    async fn get_book(&self, dto: GetBookDto) -> error_stack::Result<BookDto, KernelError> {
        let mut con = self.database_connection().transact().await?;

        let book = self
            .book_query()
            .find_by_id(&mut con, &BookId::new(dto.id))
            .await?
            .ok_or_else(|| book_not_found(&dto.id))?;

        Ok(BookDto::from(book))
    }

    async fn get_all_books(
        &self,
        dto: GetAllBookDto,
    ) -> error_stack::Result<PageDto<BookDto>, KernelError> {
        let pagination = dto.page.into_pagination()?;
        let mut con = self.database_connection().transact().await?;

        let page = self
            .book_query()
            .find_page(&mut con, &BookFilter::all(), &pagination)
            .await?;

        Ok(PageDto::from(page))
    }

    async fn search_books(
        &self,
        dto: SearchBookDto,
    ) -> error_stack::Result<PageDto<BookDto>, KernelError> {
        let SearchBookDto {
            title_part,
            author,
            isbn,
            description_part,
            page,
        } = dto;
        let pagination = page.into_pagination()?;
        let params = BookSearchParameters {
            title_part,
            author,
            isbn,
            description_part,
        };
        let filter =
            BookSpecificationBuilder::new(self.book_specification_registry()).build(&params)?;
        let mut con = self.database_connection().transact().await?;

        let page = self
            .book_query()
            .find_page(&mut con, &filter, &pagination)
            .await?;

        Ok(PageDto::from(page))
    }

    async fn get_books_by_category(
        &self,
        dto: GetBooksByCategoryDto,
    ) -> error_stack::Result<PageDto<BookDto>, KernelError> {
        let pagination = dto.page.into_pagination()?;
        let mut con = self.database_connection().transact().await?;

        let category_id = CategoryId::new(dto.category_id);
        if self
            .category_query()
            .find_by_id(&mut con, &category_id)
            .await?
            .is_none()
        {
            return Err(KernelError::NotFound.with_message(format!(
                "Can't find category by id: {}",
                dto.category_id
            )));
        }

        let page = self
            .book_query()
            .find_by_category_id(&mut con, &category_id, &pagination)
            .await?;

        Ok(PageDto::from(page))
    }
}

impl<T> GetBookService for T where
    T: DependOnBookQuery + DependOnCategoryQuery + DependOnBookSpecificationRegistry
{
}

#[async_trait::async_trait]
pub trait CreateBookService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnBookModifier
    + DependOnCategoryQuery
{
    async fn create_book(&self, dto: CreateBookDto) -> error_stack::Result<BookDto, KernelError> {
        dto.validate()?;
        let mut con = self.database_connection().transact().await?;

        let category_ids = dto
            .category_ids
            .into_iter()
            .map(CategoryId::new)
            .collect::<BTreeSet<_>>();
        ensure_categories_exist(self.category_query(), &mut con, &category_ids).await?;

        let book = Book::new(
            BookId::new(Uuid::new_v4()),
            BookTitle::new(dto.title),
            BookAuthor::new(dto.author),
            Isbn::new(dto.isbn),
            BookPrice::new(dto.price),
            dto.description.map(BookDescription::new),
            dto.cover_image.map(CoverImage::new),
            category_ids,
            IsDeleted::active(),
        );
        self.book_modifier().create(&mut con, &book).await?;
        con.commit().await?;

        info!("Created book: {}", book.id().as_ref());
        Ok(BookDto::from(book))
    }
}

impl<T> CreateBookService for T where T: DependOnBookModifier + DependOnCategoryQuery {}

#[async_trait::async_trait]
pub trait UpdateBookService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnBookQuery
    + DependOnBookModifier
    + DependOnCategoryQuery
{
    async fn update_book(&self, dto: UpdateBookDto) -> error_stack::Result<BookDto, KernelError> {
        dto.validate()?;
        let mut con = self.database_connection().transact().await?;

        let mut book = self
            .book_query()
            .find_by_id(&mut con, &BookId::new(dto.id))
            .await?
            .ok_or_else(|| book_not_found(&dto.id))?;

        let category_ids = dto
            .category_ids
            .map(|ids| ids.into_iter().map(CategoryId::new).collect::<BTreeSet<_>>());
        if let Some(category_ids) = &category_ids {
            ensure_categories_exist(self.category_query(), &mut con, category_ids).await?;
        }

        book.substitute(|book| {
            if let Some(title) = dto.title {
                *book.title = BookTitle::new(title);
            }
            if let Some(author) = dto.author {
                *book.author = BookAuthor::new(author);
            }
            if let Some(isbn) = dto.isbn {
                *book.isbn = Isbn::new(isbn);
            }
            if let Some(price) = dto.price {
                *book.price = BookPrice::new(price);
            }
            if let Some(description) = dto.description {
                *book.description = Some(BookDescription::new(description));
            }
            if let Some(cover_image) = dto.cover_image {
                *book.cover_image = Some(CoverImage::new(cover_image));
            }
            if let Some(category_ids) = category_ids {
                *book.category_ids = category_ids;
            }
        });
        self.book_modifier().update(&mut con, &book).await?;
        con.commit().await?;

        info!("Updated book: {}", dto.id);
        Ok(BookDto::from(book))
    }
}

impl<T> UpdateBookService for T where
    T: DependOnBookQuery + DependOnBookModifier + DependOnCategoryQuery
{
}

#[async_trait::async_trait]
pub trait DeleteBookService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookQuery + DependOnBookModifier
{
    async fn delete_book(&self, dto: DeleteBookDto) -> error_stack::Result<(), KernelError> {
        let mut con = self.database_connection().transact().await?;

        let id = BookId::new(dto.id);
        if self.book_query().find_by_id(&mut con, &id).await?.is_none() {
            return Err(book_not_found(&dto.id));
        }
        self.book_modifier().delete(&mut con, &id).await?;
        con.commit().await?;

        info!("Deleted book: {}", dto.id);
        Ok(())
    }
}

impl<T> DeleteBookService for T where T: DependOnBookQuery + DependOnBookModifier {}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use uuid::Uuid;

    use driver::database::InMemoryDatabase;
    use kernel::KernelError;

    use crate::service::{
        CreateBookService, CreateCategoryService, DeleteBookService, GetBookService,
        UpdateBookService,
    };
    use crate::transfer::{
        BookDto, CreateBookDto, CreateCategoryDto, DeleteBookDto, GetAllBookDto, GetBookDto,
        GetBooksByCategoryDto, PageRequestDto, SearchBookDto, UpdateBookDto,
    };

    fn create_dto(title: &str, author: &str, isbn: &str, price: &str) -> CreateBookDto {
        CreateBookDto {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            price: Decimal::from_str(price).unwrap(),
            description: None,
            cover_image: None,
            category_ids: Vec::new(),
        }
    }

    async fn seed(db: &InMemoryDatabase) -> (BookDto, BookDto) {
        let gatsby = db
            .create_book(CreateBookDto {
                description: Some("A novel of the Jazz Age".into()),
                ..create_dto("The Great Gatsby", "F. Scott Fitzgerald", "9780743273565", "10.99")
            })
            .await
            .unwrap();
        let clean_code = db
            .create_book(create_dto("Clean Code", "Robert C. Martin", "9780132350884", "33.50"))
            .await
            .unwrap();
        (gatsby, clean_code)
    }

    #[tokio::test]
    async fn empty_search_equals_unfiltered_listing() {
        let db = InMemoryDatabase::new();
        seed(&db).await;

        let searched = db.search_books(SearchBookDto::default()).await.unwrap();
        let listed = db
            .get_all_books(GetAllBookDto {
                page: PageRequestDto::default(),
            })
            .await
            .unwrap();

        assert_eq!(searched.total, 2);
        assert_eq!(searched.items, listed.items);
    }

    #[tokio::test]
    async fn search_by_isbn_and_title_part() {
        let db = InMemoryDatabase::new();
        let (gatsby, _) = seed(&db).await;

        let by_isbn = db
            .search_books(SearchBookDto {
                isbn: Some("9780743273565".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_isbn.items, vec![gatsby.clone()]);

        let by_title = db
            .search_books(SearchBookDto {
                title_part: Some("gats".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_title.items, vec![gatsby]);

        let combined = db
            .search_books(SearchBookDto {
                title_part: Some("gats".into()),
                author: Some("Robert C. Martin".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(combined.items.is_empty());
    }

    #[tokio::test]
    async fn duplicate_isbn_conflicts() {
        let db = InMemoryDatabase::new();
        seed(&db).await;

        let error = db
            .create_book(create_dto("Copy", "Someone", "9780743273565", "1.00"))
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Conflict);
    }

    #[tokio::test]
    async fn invalid_books_are_rejected() {
        let db = InMemoryDatabase::new();

        let error = db
            .create_book(CreateBookDto {
                cover_image: Some("not a url".into()),
                ..create_dto("", "Someone", "123", "0")
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Validation);

        let error = db
            .create_book(CreateBookDto {
                category_ids: vec![Uuid::new_v4()],
                ..create_dto("Title", "Someone", "123", "1.00")
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::NotFound);
    }

    #[tokio::test]
    async fn prices_outside_the_stored_precision_are_rejected() {
        let db = InMemoryDatabase::new();
        let (gatsby, _) = seed(&db).await;

        let error = db
            .create_book(create_dto("Title", "Someone", "123", "1.005"))
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Validation);

        let error = db
            .update_book(UpdateBookDto {
                id: gatsby.id,
                price: Some(Decimal::MAX),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Validation);

        let stored = db.get_book(GetBookDto { id: gatsby.id }).await.unwrap();
        assert_eq!(stored.price, gatsby.price);
    }

    #[tokio::test]
    async fn partial_update_keeps_absent_fields() {
        let db = InMemoryDatabase::new();
        let (gatsby, _) = seed(&db).await;

        let updated = db
            .update_book(UpdateBookDto {
                id: gatsby.id,
                price: Some(Decimal::from_str("12.50").unwrap()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.price, Decimal::from_str("12.50").unwrap());
        assert_eq!(updated.title, gatsby.title);
        assert_eq!(updated.description, gatsby.description);
    }

    #[tokio::test]
    async fn deleted_books_are_invisible() {
        let db = InMemoryDatabase::new();
        let (gatsby, _) = seed(&db).await;

        db.delete_book(DeleteBookDto { id: gatsby.id }).await.unwrap();

        let error = db.get_book(GetBookDto { id: gatsby.id }).await.unwrap_err();
        assert_eq!(error.current_context(), &KernelError::NotFound);
        let listed = db.search_books(SearchBookDto::default()).await.unwrap();
        assert_eq!(listed.total, 1);

        let error = db
            .delete_book(DeleteBookDto { id: gatsby.id })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::NotFound);
    }

    #[tokio::test]
    async fn books_by_category() {
        let db = InMemoryDatabase::new();
        let fiction = db
            .create_category(CreateCategoryDto {
                name: "Fiction".into(),
                description: "Made up".into(),
            })
            .await
            .unwrap();
        let gatsby = db
            .create_book(CreateBookDto {
                category_ids: vec![fiction.id],
                ..create_dto("The Great Gatsby", "F. Scott Fitzgerald", "9780743273565", "10.99")
            })
            .await
            .unwrap();
        db.create_book(create_dto("Clean Code", "Robert C. Martin", "9780132350884", "33.50"))
            .await
            .unwrap();

        let page = db
            .get_books_by_category(GetBooksByCategoryDto {
                category_id: fiction.id,
                page: PageRequestDto::default(),
            })
            .await
            .unwrap();
        assert_eq!(page.items, vec![gatsby]);

        let error = db
            .get_books_by_category(GetBooksByCategoryDto {
                category_id: Uuid::new_v4(),
                page: PageRequestDto::default(),
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::NotFound);
    }
}
