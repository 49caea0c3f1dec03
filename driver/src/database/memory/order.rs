use std::cmp::Ordering;

use kernel::interface::query::OrderQuery;
use kernel::interface::update::OrderModifier;
use kernel::prelude::entity::{
    Order, OrderId, OrderSortKey, Page, Pagination, SortDirection, UserId,
};
use kernel::KernelError;

use crate::database::memory::InMemoryTransaction;

pub struct InMemoryOrderRepository;

#[async_trait::async_trait]
impl OrderQuery for InMemoryOrderRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &OrderId,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        Ok(con.store().orders.get(id).cloned())
    }

    async fn find_by_id_and_user_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &OrderId,
        user_id: &UserId,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        Ok(con
            .store()
            .orders
            .get(id)
            .filter(|order| order.user_id() == user_id)
            .cloned())
    }

    async fn find_page_by_user_id(
        &self,
        con: &mut InMemoryTransaction,
        user_id: &UserId,
        pagination: &Pagination<OrderSortKey>,
    ) -> error_stack::Result<Page<Order>, KernelError> {
        let sort = pagination.sort();
        let mut orders = con
            .store()
            .orders
            .values()
            .filter(|order| order.user_id() == user_id)
            .cloned()
            .collect::<Vec<_>>();
        orders.sort_by(|a, b| {
            let ordering =
                compare(sort.key(), a, b).then_with(|| a.id().as_ref().cmp(b.id().as_ref()));
            match sort.direction() {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
        let total = i64::try_from(orders.len()).unwrap_or(i64::MAX);
        Ok(Page::new(
            pagination.window(orders),
            total,
            pagination.limit(),
            pagination.offset(),
        ))
    }
}

#[async_trait::async_trait]
impl OrderModifier for InMemoryOrderRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        order: &Order,
    ) -> error_stack::Result<(), KernelError> {
        con.store().orders.insert(*order.id(), order.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        order: &Order,
    ) -> error_stack::Result<(), KernelError> {
        if let Some(stored) = con.store().orders.get_mut(order.id()) {
            let status = *order.status();
            stored.substitute(|stored| *stored.status = status);
        }
        Ok(())
    }
}

fn compare(key: OrderSortKey, a: &Order, b: &Order) -> Ordering {
    match key {
        OrderSortKey::OrderDate => a.order_date().as_ref().cmp(b.order_date().as_ref()),
        OrderSortKey::Total => a.total().as_ref().cmp(b.total().as_ref()),
        OrderSortKey::Status => a.status().as_str().cmp(b.status().as_str()),
    }
}

#[cfg(test)]
mod test {
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::OrderQuery;
    use kernel::interface::update::OrderModifier;
    use kernel::prelude::entity::{
        CreatedAt, FirstName, LastName, Order, OrderId, OrderSortKey, OrderStatus, OrderTotal,
        Pagination, SelectLimit, SelectOffset, ShippingAddress, Sort, SortDirection, UserId,
    };

    use crate::database::{InMemoryDatabase, InMemoryOrderRepository};

    fn order(user_id: UserId, days_ago: i64) -> Order {
        Order::new(
            OrderId::new(Uuid::new_v4()),
            user_id,
            FirstName::new("Nick"),
            LastName::new("Carraway"),
            ShippingAddress::new("West Egg"),
            OrderStatus::New,
            OrderTotal::new(rust_decimal::Decimal::ZERO),
            CreatedAt::new(OffsetDateTime::now_utc() - Duration::days(days_ago)),
            Vec::new(),
        )
    }

    #[tokio::test]
    async fn orders_are_scoped_to_their_owner() {
        let db = InMemoryDatabase::new();
        let mut con = db.transact().await.unwrap();
        let owner = UserId::new(Uuid::new_v4());
        let stranger = UserId::new(Uuid::new_v4());
        let older = order(owner, 2);
        let newer = order(owner, 1);
        for order in [&older, &newer, &order(stranger, 0)] {
            InMemoryOrderRepository.create(&mut con, order).await.unwrap();
        }

        let newest_first = Pagination::new(
            SelectLimit::new(10),
            SelectOffset::new(0),
            Sort::new(OrderSortKey::OrderDate, SortDirection::Desc),
        );
        let page = InMemoryOrderRepository
            .find_page_by_user_id(&mut con, &owner, &newest_first)
            .await
            .unwrap();
        assert_eq!(page.total(), 2);
        assert_eq!(page.items(), &[newer.clone(), older.clone()]);

        let found = InMemoryOrderRepository
            .find_by_id_and_user_id(&mut con, older.id(), &stranger)
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn update_writes_only_the_status() {
        let db = InMemoryDatabase::new();
        let mut con = db.transact().await.unwrap();
        let order = order(UserId::new(Uuid::new_v4()), 0);
        InMemoryOrderRepository.create(&mut con, &order).await.unwrap();

        let mut changed = order.clone();
        changed.substitute(|changed| {
            *changed.status = OrderStatus::Completed;
            *changed.shipping_address = ShippingAddress::new("East Egg");
        });
        InMemoryOrderRepository
            .update(&mut con, &changed)
            .await
            .unwrap();

        let stored = InMemoryOrderRepository
            .find_by_id(&mut con, order.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status(), &OrderStatus::Completed);
        assert_eq!(stored.shipping_address(), order.shipping_address());
    }
}
