use error_stack::Report;
use tracing::{info, warn};
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnOrderQuery, DependOnShoppingCartQuery, DependOnUserQuery, OrderQuery,
    ShoppingCartQuery, UserQuery,
};
use kernel::interface::update::{
    DependOnOrderModifier, DependOnShoppingCartModifier, OrderModifier, ShoppingCartModifier,
};
use kernel::prelude::entity::{
    CreatedAt, Order, OrderId, OrderItemId, OrderStatus, ShippingAddress, UserId,
};
use kernel::KernelError;

use crate::transfer::{
    CreateOrderDto, GetOrderItemDto, GetOrderItemsDto, GetOrdersDto, OrderDto, OrderItemDto,
    PageDto, UpdateOrderStatusDto,
};

fn order_not_found(id: &Uuid) -> Report<KernelError> {
    KernelError::NotFound.with_message(format!("Can't find order by id: {id}"))
}

#[async_trait::async_trait]
pub trait CreateOrderService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnUserQuery
    + DependOnShoppingCartQuery
    + DependOnShoppingCartModifier
    + DependOnOrderModifier
{
    /// Turns the user's cart into a `NEW` order and empties the cart, atomically.
    async fn create_order(&self, dto: CreateOrderDto) -> error_stack::Result<OrderDto, KernelError> {
        dto.validate()?;
        let mut con = self.database_connection().transact().await?;

        let user_id = UserId::new(dto.user_id);
        let placed = async {
            let user = self
                .user_query()
                .find_by_id(&mut con, &user_id)
                .await?
                .ok_or_else(|| {
                    KernelError::NotFound
                        .with_message(format!("Can't find user by id: {}", dto.user_id))
                })?;
            let mut cart = self
                .shopping_cart_query()
                .find_by_user_id(&mut con, &user_id)
                .await?
                .ok_or_else(|| {
                    KernelError::NotFound.with_message(format!(
                        "Can't find shopping cart for user: {}",
                        dto.user_id
                    ))
                })?;
            if cart.is_empty() {
                return Err(KernelError::BusinessRule
                    .with_message("Can't create order: shopping cart is empty"));
            }

            let order = Order::place(
                OrderId::new(Uuid::new_v4()),
                &user,
                ShippingAddress::new(dto.shipping_address.trim()),
                &cart,
                CreatedAt::now(),
                || OrderItemId::new(Uuid::new_v4()),
            );
            self.order_modifier().create(&mut con, &order).await?;

            cart.clear();
            self.shopping_cart_modifier().update(&mut con, &cart).await?;
            Ok::<Order, Report<KernelError>>(order)
        }
        .await;

        match placed {
            Ok(order) => {
                con.commit().await?;
                info!(
                    "Placed order {} for user {} with total {}",
                    order.id().as_ref(),
                    dto.user_id,
                    order.total().as_ref()
                );
                Ok(OrderDto::from(order))
            }
            Err(report) => {
                if let Err(rollback) = con.roll_back().await {
                    warn!("Failed to roll back order placement: {rollback:?}");
                }
                Err(report)
            }
        }
    }
}

impl<T> CreateOrderService for T where
    T: DependOnUserQuery
        + DependOnShoppingCartQuery
        + DependOnShoppingCartModifier
        + DependOnOrderModifier
{
}

#[async_trait::async_trait]
pub trait GetOrderService: 'static + Sync + Send + DependOnDatabaseConnection + DependOnOrderQuery {
    async fn list_orders(
        &self,
        dto: GetOrdersDto,
    ) -> error_stack::Result<PageDto<OrderDto>, KernelError> {
        let pagination = dto.page.into_pagination()?;
        let mut con = self.database_connection().transact().await?;
        let page = self
            .order_query()
            .find_page_by_user_id(&mut con, &UserId::new(dto.user_id), &pagination)
            .await?;
        Ok(PageDto::from(page))
    }

    /// Orders owned by someone else are reported as missing.
    async fn get_order_items(
        &self,
        dto: GetOrderItemsDto,
    ) -> error_stack::Result<Vec<OrderItemDto>, KernelError> {
        let mut con = self.database_connection().transact().await?;
        let order = self
            .order_query()
            .find_by_id_and_user_id(&mut con, &OrderId::new(dto.order_id), &UserId::new(dto.user_id))
            .await?
            .ok_or_else(|| order_not_found(&dto.order_id))?;
        Ok(order
            .into_destruct()
            .items
            .into_iter()
            .map(OrderItemDto::from)
            .collect())
    }

    async fn get_order_item(
        &self,
        dto: GetOrderItemDto,
    ) -> error_stack::Result<OrderItemDto, KernelError> {
        let mut con = self.database_connection().transact().await?;
        let order = self
            .order_query()
            .find_by_id_and_user_id(&mut con, &OrderId::new(dto.order_id), &UserId::new(dto.user_id))
            .await?
            .ok_or_else(|| order_not_found(&dto.order_id))?;
        let item = order
            .find_item(&OrderItemId::new(dto.item_id))
            .cloned()
            .ok_or_else(|| {
                KernelError::NotFound.with_message(format!(
                    "Can't find item {} in order {}",
                    dto.item_id, dto.order_id
                ))
            })?;
        Ok(OrderItemDto::from(item))
    }
}

impl<T> GetOrderService for T where T: DependOnOrderQuery {}

#[async_trait::async_trait]
pub trait UpdateOrderStatusService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnOrderQuery + DependOnOrderModifier
{
    /// Any status may replace any other.
    async fn update_status(
        &self,
        dto: UpdateOrderStatusDto,
    ) -> error_stack::Result<OrderDto, KernelError> {
        let status = dto.status.parse::<OrderStatus>()?;
        let mut con = self.database_connection().transact().await?;

        let mut order = self
            .order_query()
            .find_by_id(&mut con, &OrderId::new(dto.order_id))
            .await?
            .ok_or_else(|| order_not_found(&dto.order_id))?;
        order.substitute(|order| *order.status = status);
        self.order_modifier().update(&mut con, &order).await?;
        con.commit().await?;

        info!("Order {} is now {status}", dto.order_id);
        Ok(OrderDto::from(order))
    }
}

impl<T> UpdateOrderStatusService for T where T: DependOnOrderQuery + DependOnOrderModifier {}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use uuid::Uuid;

    use driver::database::{
        InMemoryDatabase, InMemoryOrderRepository, InMemoryShoppingCartRepository,
        InMemoryTransaction, InMemoryUserRepository,
    };
    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::{DependOnShoppingCartQuery, DependOnUserQuery};
    use kernel::interface::update::{
        DependOnOrderModifier, DependOnShoppingCartModifier, ShoppingCartModifier,
    };
    use kernel::prelude::entity::ShoppingCart;
    use kernel::KernelError;

    use crate::service::{
        CreateBookService, CreateOrderService, GetOrderService, RegisterUserService,
        ShoppingCartService, UpdateBookService, UpdateOrderStatusService,
    };
    use crate::transfer::{
        AddBookToCartDto, BookDto, CreateBookDto, CreateOrderDto, GetCartDto, GetOrderItemDto,
        GetOrderItemsDto, GetOrdersDto, PageRequestDto, RegisterUserDto, UpdateBookDto,
        UpdateOrderStatusDto, UserDto,
    };

    async fn register(db: &InMemoryDatabase, email: &str) -> UserDto {
        db.register(RegisterUserDto {
            email: email.into(),
            password: "secret-password".into(),
            repeat_password: "secret-password".into(),
            first_name: "Nick".into(),
            last_name: "Carraway".into(),
            shipping_address: None,
        })
        .await
        .unwrap()
    }

    async fn book(db: &InMemoryDatabase, isbn: &str, price: &str) -> BookDto {
        db.create_book(CreateBookDto {
            title: format!("Book {isbn}"),
            author: "Author".into(),
            isbn: isbn.into(),
            price: Decimal::from_str(price).unwrap(),
            description: None,
            cover_image: None,
            category_ids: Vec::new(),
        })
        .await
        .unwrap()
    }

    async fn add(db: &InMemoryDatabase, user: &UserDto, book: &BookDto, quantity: i32) {
        db.add_book(AddBookToCartDto {
            user_id: user.id,
            book_id: book.id,
            quantity,
        })
        .await
        .unwrap();
    }

    fn order_dto(user: &UserDto) -> CreateOrderDto {
        CreateOrderDto {
            user_id: user.id,
            shipping_address: "West Egg, Long Island".into(),
        }
    }

    /// Delegates to the in-memory store but fails every cart write, which happens
    /// after the order row is inserted.
    struct CartWriteFails(InMemoryDatabase);

    struct FailingCartModifier;

    #[async_trait::async_trait]
    impl ShoppingCartModifier for FailingCartModifier {
        type Transaction = InMemoryTransaction;

        async fn create(
            &self,
            con: &mut InMemoryTransaction,
            cart: &ShoppingCart,
        ) -> error_stack::Result<(), KernelError> {
            InMemoryShoppingCartRepository.create(con, cart).await
        }

        async fn update(
            &self,
            _: &mut InMemoryTransaction,
            cart: &ShoppingCart,
        ) -> error_stack::Result<(), KernelError> {
            Err(KernelError::Concurrency.with_message(format!(
                "Shopping cart {} was modified concurrently",
                cart.id().as_ref()
            )))
        }
    }

    #[async_trait::async_trait]
    impl DatabaseConnection for CartWriteFails {
        type Transaction = InMemoryTransaction;
        async fn transact(&self) -> error_stack::Result<InMemoryTransaction, KernelError> {
            self.0.transact().await
        }
    }

    impl DependOnUserQuery for CartWriteFails {
        type UserQuery = InMemoryUserRepository;
        fn user_query(&self) -> &Self::UserQuery {
            self.0.user_query()
        }
    }

    impl DependOnShoppingCartQuery for CartWriteFails {
        type ShoppingCartQuery = InMemoryShoppingCartRepository;
        fn shopping_cart_query(&self) -> &Self::ShoppingCartQuery {
            self.0.shopping_cart_query()
        }
    }

    impl DependOnShoppingCartModifier for CartWriteFails {
        type ShoppingCartModifier = FailingCartModifier;
        fn shopping_cart_modifier(&self) -> &Self::ShoppingCartModifier {
            &FailingCartModifier
        }
    }

    impl DependOnOrderModifier for CartWriteFails {
        type OrderModifier = InMemoryOrderRepository;
        fn order_modifier(&self) -> &Self::OrderModifier {
            self.0.order_modifier()
        }
    }

    #[tokio::test]
    async fn register_add_add_order_scenario() {
        let db = InMemoryDatabase::new();
        let user = register(&db, "nick@example.com").await;
        let novel = book(&db, "111", "19.99").await;
        add(&db, &user, &novel, 2).await;
        add(&db, &user, &novel, 3).await;

        let order = db.create_order(order_dto(&user)).await.unwrap();

        assert_eq!(order.status, "NEW");
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].book_id, novel.id);
        assert_eq!(order.items[0].quantity, 5);
        assert_eq!(order.items[0].price, novel.price);
        assert_eq!(order.total, novel.price * Decimal::from(5));
        assert_eq!(order.total, Decimal::from_str("99.95").unwrap());
        assert_eq!(order.first_name, "Nick");
        assert_eq!(order.shipping_address, "West Egg, Long Island");
        let cart = db.get_cart(GetCartDto { user_id: user.id }).await.unwrap();
        assert!(cart.items.is_empty());
    }

    #[tokio::test]
    async fn totals_sum_lines_of_different_books() {
        let db = InMemoryDatabase::new();
        let user = register(&db, "nick@example.com").await;
        let cheap = book(&db, "111", "0.10").await;
        let expensive = book(&db, "222", "19.99").await;
        add(&db, &user, &cheap, 3).await;
        add(&db, &user, &expensive, 2).await;

        let order = db.create_order(order_dto(&user)).await.unwrap();

        assert_eq!(order.items.len(), 2);
        assert_eq!(order.total, Decimal::from_str("40.28").unwrap());
    }

    #[tokio::test]
    async fn failed_cart_write_leaves_no_order_and_keeps_cart() {
        let db = InMemoryDatabase::new();
        let user = register(&db, "nick@example.com").await;
        let novel = book(&db, "111", "19.99").await;
        add(&db, &user, &novel, 2).await;
        let before = db.get_cart(GetCartDto { user_id: user.id }).await.unwrap();

        let error = CartWriteFails(db.clone())
            .create_order(order_dto(&user))
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Concurrency);

        let listed = db
            .list_orders(GetOrdersDto {
                user_id: user.id,
                page: PageRequestDto::default(),
            })
            .await
            .unwrap();
        assert_eq!(listed.total, 0);
        let after = db.get_cart(GetCartDto { user_id: user.id }).await.unwrap();
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn later_price_changes_do_not_touch_orders() {
        let db = InMemoryDatabase::new();
        let user = register(&db, "nick@example.com").await;
        let cheap = book(&db, "111", "0.10").await;
        add(&db, &user, &cheap, 3).await;
        let order = db.create_order(order_dto(&user)).await.unwrap();

        db.update_book(UpdateBookDto {
            id: cheap.id,
            price: Some(Decimal::from_str("5.00").unwrap()),
            ..Default::default()
        })
        .await
        .unwrap();

        let items = db
            .get_order_items(GetOrderItemsDto {
                user_id: user.id,
                order_id: order.id,
            })
            .await
            .unwrap();
        assert_eq!(items[0].price, Decimal::from_str("0.10").unwrap());
        let listed = db
            .list_orders(GetOrdersDto {
                user_id: user.id,
                page: PageRequestDto::default(),
            })
            .await
            .unwrap();
        assert_eq!(listed.items[0].total, Decimal::from_str("0.30").unwrap());
    }

    #[tokio::test]
    async fn empty_cart_is_rejected_without_side_effects() {
        let db = InMemoryDatabase::new();
        let user = register(&db, "nick@example.com").await;

        let error = db.create_order(order_dto(&user)).await.unwrap_err();
        assert_eq!(error.current_context(), &KernelError::BusinessRule);

        let listed = db
            .list_orders(GetOrdersDto {
                user_id: user.id,
                page: PageRequestDto::default(),
            })
            .await
            .unwrap();
        assert_eq!(listed.total, 0);
    }

    #[tokio::test]
    async fn blank_shipping_address_is_rejected() {
        let db = InMemoryDatabase::new();
        let user = register(&db, "nick@example.com").await;
        let error = db
            .create_order(CreateOrderDto {
                user_id: user.id,
                shipping_address: "  ".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Validation);
    }

    #[tokio::test]
    async fn orders_of_other_users_are_not_found() {
        let db = InMemoryDatabase::new();
        let owner = register(&db, "nick@example.com").await;
        let stranger = register(&db, "tom@example.com").await;
        let cheap = book(&db, "111", "0.10").await;
        add(&db, &owner, &cheap, 1).await;
        let order = db.create_order(order_dto(&owner)).await.unwrap();
        let item_id = order.items[0].id;

        let error = db
            .get_order_items(GetOrderItemsDto {
                user_id: stranger.id,
                order_id: order.id,
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::NotFound);

        let error = db
            .get_order_item(GetOrderItemDto {
                user_id: stranger.id,
                order_id: order.id,
                item_id,
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::NotFound);

        let item = db
            .get_order_item(GetOrderItemDto {
                user_id: owner.id,
                order_id: order.id,
                item_id,
            })
            .await
            .unwrap();
        assert_eq!(item.book_id, cheap.id);
    }

    #[tokio::test]
    async fn status_updates_are_permissive_but_validated() {
        let db = InMemoryDatabase::new();
        let user = register(&db, "nick@example.com").await;
        let cheap = book(&db, "111", "0.10").await;
        add(&db, &user, &cheap, 1).await;
        let order = db.create_order(order_dto(&user)).await.unwrap();

        for status in ["COMPLETED", "NEW", "PENDING"] {
            let updated = db
                .update_status(UpdateOrderStatusDto {
                    order_id: order.id,
                    status: status.into(),
                })
                .await
                .unwrap();
            assert_eq!(updated.status, status);
        }

        let error = db
            .update_status(UpdateOrderStatusDto {
                order_id: order.id,
                status: "SHIPPED".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Validation);

        let error = db
            .update_status(UpdateOrderStatusDto {
                order_id: Uuid::new_v4(),
                status: "PENDING".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::NotFound);
    }
}
