mod book;
mod cart;
mod category;
mod order;
mod page;
mod user;

pub use self::{book::*, cart::*, category::*, order::*, page::*, user::*};
