use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use kernel::interface::query::CategoryQuery;
use kernel::interface::update::CategoryModifier;
use kernel::prelude::entity::{
    Category, CategoryDescription, CategoryId, CategoryName, CategorySortKey, IsDeleted, Page,
    Pagination,
};
use kernel::KernelError;

use crate::database::postgres::PostgresConnection;
use crate::error::ConvertError;

pub struct PostgresCategoryRepository;

#[async_trait::async_trait]
impl CategoryQuery for PostgresCategoryRepository {
    type Transaction = PostgresConnection;

    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &CategoryId,
    ) -> error_stack::Result<Option<Category>, KernelError> {
        PgCategoryInternal::find_by_id(con, id).await
    }

    async fn find_page(
        &self,
        con: &mut PostgresConnection,
        pagination: &Pagination<CategorySortKey>,
    ) -> error_stack::Result<Page<Category>, KernelError> {
        PgCategoryInternal::find_page(con, pagination).await
    }
}

#[async_trait::async_trait]
impl CategoryModifier for PostgresCategoryRepository {
    type Transaction = PostgresConnection;

    async fn create(
        &self,
        con: &mut PostgresConnection,
        category: &Category,
    ) -> error_stack::Result<(), KernelError> {
        PgCategoryInternal::create(con, category).await
    }

    async fn update(
        &self,
        con: &mut PostgresConnection,
        category: &Category,
    ) -> error_stack::Result<(), KernelError> {
        PgCategoryInternal::update(con, category).await
    }

    async fn delete(
        &self,
        con: &mut PostgresConnection,
        category_id: &CategoryId,
    ) -> error_stack::Result<(), KernelError> {
        PgCategoryInternal::delete(con, category_id).await
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    description: String,
    is_deleted: bool,
}

impl From<CategoryRow> for Category {
    fn from(value: CategoryRow) -> Self {
        Category::new(
            CategoryId::new(value.id),
            CategoryName::new(value.name),
            CategoryDescription::new(value.description),
            IsDeleted::new(value.is_deleted),
        )
    }
}

pub(in crate::database) struct PgCategoryInternal;

impl PgCategoryInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &CategoryId,
    ) -> error_stack::Result<Option<Category>, KernelError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            // language=postgresql
            r#"
            SELECT id, name, description, is_deleted
            FROM categories
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Category::from))
    }

    async fn find_page(
        con: &mut PgConnection,
        pagination: &Pagination<CategorySortKey>,
    ) -> error_stack::Result<Page<Category>, KernelError> {
        // language=postgresql
        let (total,) = sqlx::query_as::<_, (i64,)>(
            "SELECT COUNT(*) FROM categories WHERE is_deleted = FALSE",
        )
        .fetch_one(&mut *con)
        .await
        .convert_error()?;

        let sort = pagination.sort();
        let column = match sort.key() {
            CategorySortKey::Name => "name",
        };
        let direction = sort.direction().as_sql();
        // language=postgresql
        let mut select = QueryBuilder::<Postgres>::new(
            "SELECT id, name, description, is_deleted FROM categories WHERE is_deleted = FALSE",
        );
        select
            .push(format!(" ORDER BY {column} {direction}, id {direction} LIMIT "))
            .push_bind(i64::from(i32::from(pagination.limit())))
            .push(" OFFSET ")
            .push_bind(i64::from(i32::from(pagination.offset())));
        let rows = select
            .build_query_as::<CategoryRow>()
            .fetch_all(&mut *con)
            .await
            .convert_error()?;

        Ok(Page::new(
            rows.into_iter().map(Category::from).collect(),
            total,
            pagination.limit(),
            pagination.offset(),
        ))
    }

    async fn create(
        con: &mut PgConnection,
        category: &Category,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, description, is_deleted)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(category.id().as_ref())
        .bind(category.name().as_ref())
        .bind(category.description().as_ref())
        .bind(category.is_deleted().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(
        con: &mut PgConnection,
        category: &Category,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            UPDATE categories
            SET name = $2, description = $3
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(category.id().as_ref())
        .bind(category.name().as_ref())
        .bind(category.description().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete(
        con: &mut PgConnection,
        category_id: &CategoryId,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query("UPDATE categories SET is_deleted = TRUE WHERE id = $1")
            .bind(category_id.as_ref())
            .execute(con)
            .await
            .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::CategoryQuery;
    use kernel::interface::update::CategoryModifier;
    use kernel::prelude::entity::{
        Category, CategoryDescription, CategoryId, CategoryName, IsDeleted,
    };
    use kernel::KernelError;

    use crate::database::{PostgresCategoryRepository, PostgresDatabase};

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn lifecycle() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let category = Category::new(
            CategoryId::new(Uuid::new_v4()),
            CategoryName::new("Poetry"),
            CategoryDescription::new("Verse"),
            IsDeleted::active(),
        );
        PostgresCategoryRepository.create(&mut con, &category).await?;
        let found = PostgresCategoryRepository
            .find_by_id(&mut con, category.id())
            .await?;
        assert_eq!(found, Some(category.clone()));

        let mut renamed = category.clone();
        renamed.substitute(|category| *category.name = CategoryName::new("Lyric poetry"));
        PostgresCategoryRepository.update(&mut con, &renamed).await?;
        let found = PostgresCategoryRepository
            .find_by_id(&mut con, category.id())
            .await?;
        assert_eq!(found, Some(renamed));

        PostgresCategoryRepository
            .delete(&mut con, category.id())
            .await?;
        let found = PostgresCategoryRepository
            .find_by_id(&mut con, category.id())
            .await?;
        assert!(found.is_none());
        Ok(())
    }
}
