mod id;
mod item;
mod status;
mod total;

pub use self::{id::*, item::*, status::*, total::*};
use crate::entity::{
    CreatedAt, FirstName, LastName, ShippingAddress, ShoppingCart, SortKey, User, UserId,
};
use destructure::{Destructure, Mutation};
use vodca::References;

/// Immutable snapshot of a cart at checkout. Only the status changes afterwards.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    first_name: FirstName,
    last_name: LastName,
    shipping_address: ShippingAddress,
    status: OrderStatus,
    total: OrderTotal,
    order_date: CreatedAt<Order>,
    items: Vec<OrderItem>,
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: OrderId,
        user_id: UserId,
        first_name: FirstName,
        last_name: LastName,
        shipping_address: ShippingAddress,
        status: OrderStatus,
        total: OrderTotal,
        order_date: CreatedAt<Order>,
        items: Vec<OrderItem>,
    ) -> Self {
        Self {
            id,
            user_id,
            first_name,
            last_name,
            shipping_address,
            status,
            total,
            order_date,
            items,
        }
    }

    /// Builds a `NEW` order from every line of `cart`, pricing each line at the
    /// book's current price. The cart itself is left untouched.
    pub fn place(
        id: OrderId,
        user: &User,
        shipping_address: ShippingAddress,
        cart: &ShoppingCart,
        order_date: CreatedAt<Order>,
        mut next_item_id: impl FnMut() -> OrderItemId,
    ) -> Self {
        let items = cart
            .items()
            .iter()
            .map(|line| OrderItem::snapshot(next_item_id(), line))
            .collect::<Vec<_>>();
        let total = OrderTotal::sum(&items);
        Self::new(
            id,
            *user.id(),
            user.first_name().clone(),
            user.last_name().clone(),
            shipping_address,
            OrderStatus::New,
            total,
            order_date,
            items,
        )
    }

    pub fn find_item(&self, item_id: &OrderItemId) -> Option<&OrderItem> {
        self.items.iter().find(|item| item.id() == item_id)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OrderSortKey {
    #[default]
    OrderDate,
    Total,
    Status,
}

impl SortKey for OrderSortKey {
    fn parse(key: &str) -> Option<Self> {
        match key {
            "orderDate" | "order_date" => Some(OrderSortKey::OrderDate),
            "total" => Some(OrderSortKey::Total),
            "status" => Some(OrderSortKey::Status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::entity::{
        Book, BookAuthor, BookId, BookPrice, BookTitle, CartItemId, CartItemQuantity, CreatedAt,
        FirstName, IsDeleted, Isbn, LastName, Order, OrderId, OrderItemId, OrderStatus,
        PasswordHash, Role, ShippingAddress, ShoppingCart, ShoppingCartId, User, UserEmail, UserId,
    };

    fn book(price: &str) -> Book {
        Book::new(
            BookId::new(Uuid::new_v4()),
            BookTitle::new("The Great Gatsby"),
            BookAuthor::new("F. Scott Fitzgerald"),
            Isbn::new(Uuid::new_v4().to_string()),
            BookPrice::new(Decimal::from_str(price).unwrap()),
            None,
            None,
            BTreeSet::new(),
            IsDeleted::active(),
        )
    }

    fn user() -> User {
        User::new(
            UserId::new(Uuid::new_v4()),
            UserEmail::new("reader@example.com"),
            PasswordHash::new("hash"),
            FirstName::new("Nick"),
            LastName::new("Carraway"),
            None,
            BTreeSet::from([Role::User]),
        )
    }

    #[test]
    fn place_snapshots_lines_and_sums_exactly() {
        let user = user();
        let mut cart = ShoppingCart::empty(ShoppingCartId::new(Uuid::new_v4()), *user.id());
        cart.add_book(
            book("0.10"),
            CartItemQuantity::new(3),
            CartItemId::new(Uuid::new_v4()),
        ).unwrap();
        cart.add_book(
            book("19.99"),
            CartItemQuantity::new(2),
            CartItemId::new(Uuid::new_v4()),
        ).unwrap();

        let order = Order::place(
            OrderId::new(Uuid::new_v4()),
            &user,
            ShippingAddress::new("West Egg"),
            &cart,
            CreatedAt::now(),
            || OrderItemId::new(Uuid::new_v4()),
        );

        assert_eq!(order.items().len(), 2);
        assert_eq!(order.status(), &OrderStatus::New);
        assert_eq!(order.total().as_ref(), &Decimal::from_str("40.28").unwrap());
        assert_eq!(order.first_name(), user.first_name());
        assert_eq!(order.user_id(), user.id());
        assert_eq!(cart.items().len(), 2);
    }
}
