//! [`Storage`]-related implementations.
//!
//! [`Storage`] keeps the device-local state: the signed-in [`User`]
//! [`Credentials`] and the [`Cart`].
//!
//! [`User`]: crate::domain::User

pub mod file;
pub mod memory;

use derive_more::{Display, Error as StdError, From};
use serde::{Deserialize, Serialize};

use crate::domain::{user::session::Credentials, Cart};

pub use self::{file::File, memory::Memory};

/// Local storage operation.
pub use common::Handler as Storage;

/// [`Storage`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Failed to access the storage file.
    #[display("Storage I/O failed: {_0}")]
    Io(std::io::Error),

    /// Stored data is not a valid JSON document.
    #[display("Stored data is malformed: {_0}")]
    Json(serde_json::Error),
}

/// Whole document of the locally stored state.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Document {
    /// [`Credentials`] of the signed-in user, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,

    /// [`Cart`] of this device, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cart: Option<Cart>,
}

/// Value occupying its own slot in a [`Document`].
pub trait Slot: Clone + Sized {
    /// Returns the slot of this value in the provided [`Document`].
    fn slot(doc: &mut Document) -> &mut Option<Self>;
}

impl Slot for Credentials {
    fn slot(doc: &mut Document) -> &mut Option<Self> {
        &mut doc.credentials
    }
}

impl Slot for Cart {
    fn slot(doc: &mut Document) -> &mut Option<Self> {
        &mut doc.cart
    }
}
