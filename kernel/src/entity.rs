mod book;
mod cart;
mod category;
mod common;
mod order;
mod user;

pub use self::{book::*, cart::*, category::*, common::*, order::*, user::*};
