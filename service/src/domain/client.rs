//! [`Client`] definitions.

use crate::domain::{order::Address, user};
#[cfg(doc)]
use crate::domain::{Order, User};

/// Customer placing [`Order`]s.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Client {
    /// ID of the client [`User`].
    pub id: user::Id,

    /// Name of this [`Client`].
    pub name: String,

    /// Company this [`Client`] represents, if any.
    pub company: Option<String>,

    /// Contact email of this [`Client`], if known.
    pub email: Option<user::Email>,

    /// Contact phone of this [`Client`], if known.
    pub phone: Option<user::Phone>,

    /// Default shipping [`Address`] of this [`Client`], if any.
    pub address: Option<Address>,

    /// Number of [`Order`]s placed by this [`Client`].
    pub total_orders: u64,
}
