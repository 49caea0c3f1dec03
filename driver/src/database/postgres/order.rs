use std::collections::HashMap;

use error_stack::Report;
use rust_decimal::Decimal;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::OrderQuery;
use kernel::interface::update::OrderModifier;
use kernel::prelude::entity::{
    BookAuthor, BookId, BookTitle, CreatedAt, FirstName, LastName, Order, OrderId, OrderItem,
    OrderItemId, OrderItemQuantity, OrderSortKey, OrderStatus, OrderTotal, Page, Pagination,
    ShippingAddress, UnitPrice, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresConnection;
use crate::error::ConvertError;

pub struct PostgresOrderRepository;

#[async_trait::async_trait]
impl OrderQuery for PostgresOrderRepository {
    type Transaction = PostgresConnection;

    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &OrderId,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        PgOrderInternal::find_one(con, id, None).await
    }

    async fn find_by_id_and_user_id(
        &self,
        con: &mut PostgresConnection,
        id: &OrderId,
        user_id: &UserId,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        PgOrderInternal::find_one(con, id, Some(user_id)).await
    }

    async fn find_page_by_user_id(
        &self,
        con: &mut PostgresConnection,
        user_id: &UserId,
        pagination: &Pagination<OrderSortKey>,
    ) -> error_stack::Result<Page<Order>, KernelError> {
        PgOrderInternal::find_page_by_user_id(con, user_id, pagination).await
    }
}

#[async_trait::async_trait]
impl OrderModifier for PostgresOrderRepository {
    type Transaction = PostgresConnection;

    async fn create(
        &self,
        con: &mut PostgresConnection,
        order: &Order,
    ) -> error_stack::Result<(), KernelError> {
        PgOrderInternal::create(con, order).await
    }

    async fn update(
        &self,
        con: &mut PostgresConnection,
        order: &Order,
    ) -> error_stack::Result<(), KernelError> {
        PgOrderInternal::update(con, order).await
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: Uuid,
    first_name: String,
    last_name: String,
    shipping_address: String,
    status: String,
    total: Decimal,
    order_date: OffsetDateTime,
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: Uuid,
    order_id: Uuid,
    book_id: Uuid,
    book_title: String,
    book_author: String,
    quantity: i32,
    price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(value: OrderItemRow) -> Self {
        OrderItem::new(
            OrderItemId::new(value.id),
            BookId::new(value.book_id),
            BookTitle::new(value.book_title),
            BookAuthor::new(value.book_author),
            OrderItemQuantity::new(value.quantity),
            UnitPrice::new(value.price),
        )
    }
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, Report<KernelError>> {
        let status = self.status.parse::<OrderStatus>()?;
        Ok(Order::new(
            OrderId::new(self.id),
            UserId::new(self.user_id),
            FirstName::new(self.first_name),
            LastName::new(self.last_name),
            ShippingAddress::new(self.shipping_address),
            status,
            OrderTotal::new(self.total),
            CreatedAt::new(self.order_date),
            items,
        ))
    }
}

// language=postgresql
const SELECT_ORDERS: &str = r#"
    SELECT id, user_id, first_name, last_name, shipping_address, status, total, order_date
    FROM orders
    "#;

fn sort_column(key: OrderSortKey) -> &'static str {
    match key {
        OrderSortKey::OrderDate => "order_date",
        OrderSortKey::Total => "total",
        OrderSortKey::Status => "status",
    }
}

pub(in crate::database) struct PgOrderInternal;

impl PgOrderInternal {
    async fn find_one(
        con: &mut PgConnection,
        id: &OrderId,
        owner: Option<&UserId>,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        let mut query = QueryBuilder::<Postgres>::new(SELECT_ORDERS);
        query.push(" WHERE id = ").push_bind(*id.as_ref());
        if let Some(owner) = owner {
            query.push(" AND user_id = ").push_bind(*owner.as_ref());
        }
        let row = query
            .build_query_as::<OrderRow>()
            .fetch_optional(&mut *con)
            .await
            .convert_error()?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut items = Self::find_items(con, vec![row.id]).await?;
        let items = items.remove(&row.id).unwrap_or_default();
        row.into_order(items).map(Some)
    }

    async fn find_page_by_user_id(
        con: &mut PgConnection,
        user_id: &UserId,
        pagination: &Pagination<OrderSortKey>,
    ) -> error_stack::Result<Page<Order>, KernelError> {
        // language=postgresql
        let (total,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM orders WHERE user_id = $1")
            .bind(user_id.as_ref())
            .fetch_one(&mut *con)
            .await
            .convert_error()?;

        let sort = pagination.sort();
        let column = sort_column(sort.key());
        let direction = sort.direction().as_sql();
        let mut select = QueryBuilder::<Postgres>::new(SELECT_ORDERS);
        select
            .push(" WHERE user_id = ")
            .push_bind(*user_id.as_ref())
            .push(format!(
                " ORDER BY {column} {direction}, id {direction} LIMIT "
            ))
            .push_bind(i64::from(i32::from(pagination.limit())))
            .push(" OFFSET ")
            .push_bind(i64::from(i32::from(pagination.offset())));
        let rows = select
            .build_query_as::<OrderRow>()
            .fetch_all(&mut *con)
            .await
            .convert_error()?;

        let mut items = Self::find_items(con, rows.iter().map(|row| row.id).collect()).await?;
        let orders = rows
            .into_iter()
            .map(|row| {
                let lines = items.remove(&row.id).unwrap_or_default();
                row.into_order(lines)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(
            orders,
            total,
            pagination.limit(),
            pagination.offset(),
        ))
    }

    async fn find_items(
        con: &mut PgConnection,
        order_ids: Vec<Uuid>,
    ) -> error_stack::Result<HashMap<Uuid, Vec<OrderItem>>, KernelError> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, OrderItemRow>(
            // language=postgresql
            r#"
            SELECT id, order_id, book_id, book_title, book_author, quantity, price
            FROM order_items
            WHERE order_id = ANY($1)
            ORDER BY order_id, position
            "#,
        )
        .bind(order_ids)
        .fetch_all(con)
        .await
        .convert_error()?;

        let mut grouped = HashMap::<Uuid, Vec<OrderItem>>::new();
        for row in rows {
            grouped
                .entry(row.order_id)
                .or_default()
                .push(OrderItem::from(row));
        }
        Ok(grouped)
    }

    async fn create(con: &mut PgConnection, order: &Order) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, first_name, last_name, shipping_address, status, total, order_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(order.id().as_ref())
        .bind(order.user_id().as_ref())
        .bind(order.first_name().as_ref())
        .bind(order.last_name().as_ref())
        .bind(order.shipping_address().as_ref())
        .bind(order.status().as_str())
        .bind(order.total().as_ref())
        .bind(order.order_date().as_ref())
        .execute(&mut *con)
        .await
        .convert_error()?;

        if order.items().is_empty() {
            return Ok(());
        }
        let size = order.items().len();
        let (mut ids, mut book_ids, mut titles, mut authors, mut quantities, mut prices) = (
            Vec::with_capacity(size),
            Vec::with_capacity(size),
            Vec::with_capacity(size),
            Vec::with_capacity(size),
            Vec::with_capacity(size),
            Vec::with_capacity(size),
        );
        for item in order.items() {
            ids.push(*AsRef::<Uuid>::as_ref(item.id()));
            book_ids.push(*AsRef::<Uuid>::as_ref(item.book_id()));
            titles.push(AsRef::<String>::as_ref(item.book_title()).clone());
            authors.push(AsRef::<String>::as_ref(item.book_author()).clone());
            quantities.push(*AsRef::<i32>::as_ref(item.quantity()));
            prices.push(*AsRef::<Decimal>::as_ref(item.price()));
        }
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO order_items (id, order_id, book_id, book_title, book_author, quantity, price, position)
            SELECT line.id, $1, line.book_id, line.book_title, line.book_author, line.quantity, line.price, line.position
            FROM UNNEST($2::UUID[], $3::UUID[], $4::TEXT[], $5::TEXT[], $6::INT4[], $7::NUMERIC[]) WITH ORDINALITY
                AS line(id, book_id, book_title, book_author, quantity, price, position)
            "#,
        )
        .bind(order.id().as_ref())
        .bind(ids)
        .bind(book_ids)
        .bind(titles)
        .bind(authors)
        .bind(quantities)
        .bind(prices)
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(con: &mut PgConnection, order: &Order) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
            .bind(order.id().as_ref())
            .bind(order.status().as_str())
            .execute(con)
            .await
            .convert_error()?;
        Ok(())
    }
}
