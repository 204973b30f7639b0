//! [`Notification`] definitions.

use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

use crate::domain::user;
#[cfg(doc)]
use crate::domain::User;

/// Message addressed to a [`User`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notification {
    /// ID of this [`Notification`].
    pub id: Id,

    /// ID of the [`User`] this [`Notification`] is addressed to, if it's not
    /// a broadcast one.
    pub user_id: Option<user::Id>,

    /// [`Kind`] of this [`Notification`].
    pub kind: Kind,

    /// Title of this [`Notification`].
    pub title: String,

    /// Message of this [`Notification`].
    pub message: String,

    /// [`DateTime`] when this [`Notification`] was created.
    ///
    /// [`DateTime`]: common::DateTime
    pub created_at: CreationDateTime,

    /// Indicator whether this [`Notification`] was read.
    pub is_read: bool,
}

/// ID of a [`Notification`].
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[as_ref(str)]
#[from(&str, String)]
pub struct Id(String);

define_kind! {
    #[doc = "Severity kind of a [`Notification`]."]
    enum Kind {
        #[doc = "Plain information."]
        #[label = "info"]
        Info = 1,

        #[doc = "Something went well."]
        #[label = "success"]
        Success = 2,

        #[doc = "Something needs attention."]
        #[label = "warning"]
        Warning = 3,

        #[doc = "Something failed."]
        #[label = "error"]
        Error = 4,
    }
}

/// [`DateTime`] when a [`Notification`] was created.
///
/// [`DateTime`]: common::DateTime
pub type CreationDateTime = DateTimeOf<(Notification, unit::Creation)>;
