mod auth;
mod book;
mod cart;
mod category;
mod order;

pub use self::{auth::*, book::*, cart::*, category::*, order::*};
