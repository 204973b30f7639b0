//! [`Command`] definition.

pub mod add_to_cart;
pub mod checkout;
pub mod clear_cart;
pub mod create_session;
pub mod delete_product;
pub mod destroy_session;
pub mod mark_notification_read;
pub mod remove_from_cart;
pub mod save_product;
pub mod transit_order;
pub mod update_cart_item;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    add_to_cart::AddToCart, checkout::Checkout, clear_cart::ClearCart,
    create_session::CreateSession, delete_product::DeleteProduct,
    destroy_session::DestroySession,
    mark_notification_read::MarkNotificationRead,
    remove_from_cart::RemoveFromCart, save_product::SaveProduct,
    transit_order::TransitOrder, update_cart_item::UpdateCartItem,
};
