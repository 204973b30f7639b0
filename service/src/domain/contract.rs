//! [`Contract`] definitions.

use common::{define_kind, unit, DateTime, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::user;
#[cfg(doc)]
use crate::domain::User;

/// Supply agreement between a supplier and the company or a client.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Contract {
    /// ID of this [`Contract`].
    pub id: Id,

    /// Title of this [`Contract`].
    pub title: String,

    /// ID of the supplier [`User`] bound by this [`Contract`], if any.
    pub supplier_id: Option<user::Id>,

    /// ID of the client [`User`] bound by this [`Contract`], if any.
    pub client_id: Option<user::Id>,

    /// Total value of this [`Contract`], if fixed.
    pub value: Option<Decimal>,

    /// [`DateTime`] when this [`Contract`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Contract`] comes into effect.
    ///
    /// [`None`] means it's effective since its creation.
    pub starts_at: Option<CommencementDateTime>,

    /// [`DateTime`] when this [`Contract`] expires.
    ///
    /// [`None`] means that this [`Contract`] is valid indefinitely.
    pub expires_at: Option<ExpirationDateTime>,

    /// [`DateTime`] when this [`Contract`] was terminated, if it was.
    pub terminated_at: Option<TerminationDateTime>,
}

impl Contract {
    /// Returns [`Status`] of this [`Contract`] at the provided moment.
    #[must_use]
    pub fn status_at(&self, now: DateTime) -> Status {
        use Status as S;

        if self.terminated_at.is_some_and(|at| at <= now.coerce()) {
            return S::Terminated;
        }

        if self.expires_at.is_some_and(|at| at < now.coerce()) {
            return S::Expired;
        }

        if self.starts_at.is_some_and(|at| at > now.coerce()) {
            return S::Pending;
        }

        S::Active
    }

    /// Returns the current [`Status`] of this [`Contract`].
    #[must_use]
    pub fn status(&self) -> Status {
        self.status_at(DateTime::now())
    }
}

/// ID of a [`Contract`].
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
    #[doc = "Status of a [`Contract`]."]
    enum Status {
        #[doc = "[`Contract`] is not in effect yet."]
        #[label = "Pending"]
        Pending = 1,

        #[doc = "[`Contract`] is in effect."]
        #[label = "Active"]
        Active = 2,

        #[doc = "[`Contract`] has run out."]
        #[label = "Expired"]
        Expired = 3,

        #[doc = "[`Contract`] was terminated early."]
        #[label = "Terminated"]
        Terminated = 4,
    }
}

/// [`DateTime`] when a [`Contract`] was created.
pub type CreationDateTime = DateTimeOf<(Contract, unit::Creation)>;

/// [`DateTime`] when a [`Contract`] comes into effect.
pub type CommencementDateTime = DateTimeOf<(Contract, unit::Commencement)>;

/// [`DateTime`] when a [`Contract`] expires.
pub type ExpirationDateTime = DateTimeOf<(Contract, unit::Expiration)>;

/// [`DateTime`] when a [`Contract`] was terminated.
pub type TerminationDateTime = DateTimeOf<(Contract, unit::Termination)>;
