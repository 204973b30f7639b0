//! Domain definitions.

pub mod cart;
pub mod client;
pub mod contract;
pub mod notification;
pub mod order;
pub mod product;
pub mod supplier;
pub mod user;

pub use self::{
    cart::Cart, client::Client, contract::Contract,
    notification::Notification, order::Order, product::Product,
    supplier::Supplier, user::User,
};
