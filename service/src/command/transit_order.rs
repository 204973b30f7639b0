//! [`Command`] for transiting an [`Order`] to its next [`Status`].

use common::{
    operations::{By, Perform, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::order::Status;
use crate::{
    domain::{
        order::{self, Action, Initiator, TransitionError},
        user::session::Credentials,
        Order,
    },
    infra::{
        api::{self, Transition},
        storage, Api, Storage,
    },
    Service,
};

use super::Command;

/// [`Command`] for performing an [`Action`] on an [`Order`] on behalf of the
/// signed-in user.
///
/// The transition is validated locally first, so an illegal one never
/// reaches the [`Api`]. The local [`Order`] copy is never modified: the
/// [`Order`] returned by the [`Api`] is the result.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransitOrder {
    /// ID of the [`Order`] to transit.
    pub order_id: order::Id,

    /// [`Action`] to perform.
    pub action: Action,

    /// Comment to leave in the [`order::History`].
    pub comment: Option<String>,
}

impl<A, S> Command<TransitOrder> for Service<A, S>
where
    A: Api<
            Select<By<Option<Order>, order::Id>>,
            Ok = Option<Order>,
            Err = Traced<api::Error>,
        > + Api<Perform<Transition>, Ok = Order, Err = Traced<api::Error>>,
    S: Storage<
        Select<By<Option<Credentials>, ()>>,
        Ok = Option<Credentials>,
        Err = Traced<storage::Error>,
    >,
{
    type Ok = Order;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: TransitOrder) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let TransitOrder {
            order_id,
            action,
            comment,
        } = cmd;

        let user = self
            .storage()
            .execute(Select(By::unit()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::NotSignedIn))?
            .user;
        let initiator = Initiator {
            id: user.id,
            role: user.role,
        };

        let order = self
            .api()
            .execute(Select(By::new(order_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::OrderNotExists(order_id.clone())))?;

        let expected = order
            .transit(action, &initiator, DateTime::now(), comment.clone())
            .map_err(|e| {
                log::warn!(
                    "rejected `{action}` of `Order(id: {order_id})` \
                     by `{}` {}: {e}",
                    initiator.role,
                    initiator.id,
                );
                tracerr::new!(E::Transition(e))
            })?;

        let updated = self
            .api()
            .execute(Perform(Transition {
                order_id: order_id.clone(),
                action,
                status: expected.status,
                comment,
            }))
            .await
            .inspect_err(|e| {
                log::warn!(
                    "API refused `{action}` of `Order(id: {order_id})`: {e}",
                );
            })
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(updated)
    }
}

/// Error of [`TransitOrder`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Api`] error.
    #[display("`Api` operation failed: {_0}")]
    Api(api::Error),

    /// [`Storage`] error.
    #[display("`Storage` operation failed: {_0}")]
    Storage(storage::Error),

    /// Nobody is signed in.
    #[display("Not signed in")]
    #[from(ignore)]
    NotSignedIn,

    /// [`Order`] with the provided ID does not exist.
    #[display("`Order(id: {_0})` does not exist")]
    #[from(ignore)]
    OrderNotExists(#[error(not(source))] order::Id),

    /// [`Action`] is not allowed for the [`Order`] [`Status`] or the
    /// signed-in user.
    #[display("{_0}")]
    Transition(TransitionError),
}
