mod book;
mod cart;
mod category;
mod order;
mod user;

pub use self::{book::*, cart::*, category::*, order::*, user::*};
