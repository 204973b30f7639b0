//! [`Status`] lifecycle of an [`Order`].

use common::{define_kind, Percent};
use derive_more::{Display, Error};

use crate::domain::user::Role;
#[cfg(doc)]
use crate::domain::Order;

define_kind! {
    #[doc = "Fulfillment status of an [`Order`]."]
    enum Status {
        #[doc = "[`Order`] was placed by a client."]
        #[label = "Created"]
        Created = 1,

        #[doc = "[`Order`] was confirmed by an employee."]
        #[label = "Confirmed"]
        Confirmed = 2,

        #[doc = "[`Order`] is being prepared."]
        #[label = "Processing"]
        Processing = 3,

        #[doc = "[`Order`] was handed over to a carrier."]
        #[label = "Shipped"]
        Shipped = 4,

        #[doc = "[`Order`] is on its way to the client."]
        #[label = "In Transit"]
        InTransit = 5,

        #[doc = "[`Order`] was delivered to the shipping address."]
        #[label = "Delivered"]
        Delivered = 6,

        #[doc = "Client confirmed the [`Order`] receipt."]
        #[label = "Received"]
        Received = 7,

        #[doc = "[`Order`] was cancelled before fulfillment."]
        #[label = "Cancelled"]
        Cancelled = 8,

        #[doc = "[`Order`] was returned."]
        #[label = "Returned"]
        Returned = 9,
    }
}

define_kind! {
    #[doc = "Action requesting a [`Status`] transition of an [`Order`]."]
    enum Action {
        #[doc = "Supplier volunteers to fulfill an unassigned [`Order`]."]
        #[label = "Claim"]
        Claim = 1,

        #[doc = "Employee confirms a freshly created [`Order`]."]
        #[label = "Confirm"]
        Confirm = 2,

        #[doc = "Client or employee cancels a freshly created [`Order`]."]
        #[label = "Cancel"]
        Cancel = 3,

        #[doc = "Employee moves an [`Order`] to the next fulfillment stage."]
        #[label = "Advance"]
        Advance = 4,

        #[doc = "Client confirms a delivered [`Order`] was received."]
        #[label = "Confirm Receipt"]
        ConfirmReceipt = 5,
    }
}

impl Status {
    /// Linear fulfillment flow, in display order.
    pub const FLOW: [Self; 7] = [
        Self::Created,
        Self::Confirmed,
        Self::Processing,
        Self::Shipped,
        Self::InTransit,
        Self::Delivered,
        Self::Received,
    ];

    /// Returns the 1-based position of this [`Status`] in the [`FLOW`].
    ///
    /// [`None`] is returned for side statuses.
    ///
    /// [`FLOW`]: Self::FLOW
    #[must_use]
    pub fn step(self) -> Option<usize> {
        Self::FLOW.iter().position(|s| *s == self).map(|i| i + 1)
    }

    /// Returns the progress of an [`Order`] having this [`Status`], suitable
    /// for progress indicators.
    ///
    /// Side statuses have no progress.
    #[must_use]
    pub fn progress(self) -> Percent {
        self.step().map_or(Percent::ZERO, |step| {
            Percent::ratio(step as u64, Self::FLOW.len() as u64)
        })
    }

    /// Returns the [`Status`] following this one in the [`FLOW`], if any.
    ///
    /// [`FLOW`]: Self::FLOW
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::FLOW.get(self.step()?).copied()
    }

    /// Indicates whether no transition is possible from this [`Status`].
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Received | Self::Cancelled | Self::Returned)
    }

    /// Resolves the [`Status`] an [`Order`] gets after the provided
    /// [`Action`] is performed by a user with the provided [`Role`].
    ///
    /// `claimed` tells whether the [`Order`] has a supplier assigned already.
    ///
    /// # Errors
    ///
    /// If the [`Action`] is illegal for this [`Status`] or the [`Role`].
    pub fn transit(
        self,
        action: Action,
        role: Role,
        claimed: bool,
    ) -> Result<Self, TransitionError> {
        use Action as A;
        use Role as R;
        use TransitionError as E;

        if self.is_terminal() {
            return Err(E::Terminal(self));
        }

        let require = |allowed: &[Role]| {
            if allowed.contains(&role) {
                Ok(())
            } else {
                Err(E::Forbidden { action, role })
            }
        };

        match (self, action) {
            (Self::Created, A::Claim) => {
                require(&[R::Supplier])?;
                if claimed {
                    return Err(E::AlreadyClaimed);
                }
                Ok(Self::Created)
            }
            (Self::Created, A::Confirm) => {
                require(&[R::Employee])?;
                Ok(Self::Confirmed)
            }
            (Self::Created, A::Cancel) => {
                require(&[R::Client, R::Employee])?;
                Ok(Self::Cancelled)
            }
            (
                Self::Confirmed
                | Self::Processing
                | Self::Shipped
                | Self::InTransit,
                A::Advance,
            ) => {
                require(&[R::Employee])?;
                self.next().ok_or(E::Illegal {
                    status: self,
                    action,
                })
            }
            (Self::Delivered, A::ConfirmReceipt) => {
                require(&[R::Client])?;
                Ok(Self::Received)
            }
            (status, action) => Err(E::Illegal { status, action }),
        }
    }
}

/// Error of an illegal [`Status`] transition.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum TransitionError {
    /// [`Order`] is claimed by a supplier already.
    #[display("`Order` is claimed already")]
    AlreadyClaimed,

    /// [`Role`] is not allowed to perform the [`Action`].
    #[display("`{role}` is not allowed to `{action}`")]
    Forbidden {
        /// Requested [`Action`].
        action: Action,

        /// [`Role`] of the initiator.
        role: Role,
    },

    /// [`Action`] cannot be performed in the current [`Status`].
    #[display("cannot `{action}` an `Order` in `{status}` status")]
    Illegal {
        /// Current [`Status`].
        status: Status,

        /// Requested [`Action`].
        action: Action,
    },

    /// Initiator is not the client who placed the [`Order`].
    #[display("`Order` belongs to another client")]
    NotOwner,

    /// [`Status`] is terminal.
    #[display("`Order` in `{_0}` status cannot change anymore")]
    Terminal(#[error(not(source))] Status),
}

#[cfg(test)]
mod spec {
    use super::{Action, Role, Status, TransitionError};

    #[test]
    fn parses_labels_strictly() {
        assert_eq!("In Transit".parse::<Status>(), Ok(Status::InTransit));
        assert_eq!(Status::InTransit.to_string(), "In Transit");
        assert!("InTransit".parse::<Status>().is_err());
        assert!("Lost".parse::<Status>().is_err());
    }

    #[test]
    fn orders_flow_for_progress() {
        assert_eq!(Status::Created.step(), Some(1));
        assert_eq!(Status::Received.step(), Some(7));
        assert_eq!(Status::Cancelled.step(), None);
        assert_eq!(Status::Received.progress().to_string(), "100%");
        assert_eq!(Status::Returned.progress().to_string(), "0%");
        assert_eq!(Status::InTransit.next(), Some(Status::Delivered));
        assert_eq!(Status::Received.next(), None);
    }

    #[test]
    fn advances_linearly_by_employee() {
        let mut status = Status::Confirmed;
        for expected in [
            Status::Processing,
            Status::Shipped,
            Status::InTransit,
            Status::Delivered,
        ] {
            status = status
                .transit(Action::Advance, Role::Employee, true)
                .unwrap();
            assert_eq!(status, expected);
        }

        assert_eq!(
            status.transit(Action::Advance, Role::Employee, true),
            Err(TransitionError::Illegal {
                status: Status::Delivered,
                action: Action::Advance,
            }),
        );
    }

    #[test]
    fn confirms_receipt_by_client_only() {
        assert_eq!(
            Status::Delivered.transit(Action::ConfirmReceipt, Role::Client, true),
            Ok(Status::Received),
        );
        assert_eq!(
            Status::Delivered.transit(
                Action::ConfirmReceipt,
                Role::Employee,
                true,
            ),
            Err(TransitionError::Forbidden {
                action: Action::ConfirmReceipt,
                role: Role::Employee,
            }),
        );
        assert!(Status::Shipped
            .transit(Action::ConfirmReceipt, Role::Client, true)
            .is_err());
    }

    #[test]
    fn cancels_only_created() {
        for role in [Role::Client, Role::Employee] {
            assert_eq!(
                Status::Created.transit(Action::Cancel, role, false),
                Ok(Status::Cancelled),
            );
        }
        assert!(Status::Created
            .transit(Action::Cancel, Role::Supplier, false)
            .is_err());
        assert!(Status::Confirmed
            .transit(Action::Cancel, Role::Employee, false)
            .is_err());
    }

    #[test]
    fn claims_unassigned_only() {
        assert_eq!(
            Status::Created.transit(Action::Claim, Role::Supplier, false),
            Ok(Status::Created),
        );
        assert_eq!(
            Status::Created.transit(Action::Claim, Role::Supplier, true),
            Err(TransitionError::AlreadyClaimed),
        );
        assert!(Status::Confirmed
            .transit(Action::Claim, Role::Supplier, false)
            .is_err());
    }

    #[test]
    fn rejects_everything_from_terminal() {
        for status in [Status::Received, Status::Cancelled, Status::Returned] {
            assert!(status.is_terminal());
            for action in Action::ALL {
                for role in Role::ALL {
                    assert_eq!(
                        status.transit(*action, *role, false),
                        Err(TransitionError::Terminal(status)),
                    );
                }
            }
        }
    }

    #[test]
    fn admin_never_transits() {
        for status in Status::ALL {
            for action in Action::ALL {
                assert!(status.transit(*action, Role::Admin, false).is_err());
            }
        }
    }
}
