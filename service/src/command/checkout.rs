//! [`Command`] for placing an [`Order`] out of the [`Cart`].

use common::operations::{By, Delete, Insert, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        order::{self, Address, IncompleteAddressError, PaymentMethod, ShippingMethod},
        user::{self, session::Credentials},
        Cart, Order,
    },
    infra::{api, storage, Api, Storage},
    Service,
};

use super::Command;

/// [`Command`] for placing an [`Order`] out of the [`Cart`] items on behalf
/// of the signed-in client.
///
/// Everything is validated before the [`Order`] is sent, and the [`Cart`] is
/// emptied once the [`Api`] accepts it. Failing to empty the [`Cart`] doesn't
/// fail the placed [`Order`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Checkout {
    /// [`Address`] to ship the [`Order`] to.
    pub shipping_address: Address,

    /// Chosen [`PaymentMethod`].
    pub payment_method: PaymentMethod,

    /// Chosen [`ShippingMethod`].
    pub shipping_method: ShippingMethod,
}

impl<A, S> Command<Checkout> for Service<A, S>
where
    A: Api<Insert<order::Draft>, Ok = Order, Err = Traced<api::Error>>,
    S: Storage<
            Select<By<Option<Credentials>, ()>>,
            Ok = Option<Credentials>,
            Err = Traced<storage::Error>,
        > + Storage<
            Select<By<Option<Cart>, ()>>,
            Ok = Option<Cart>,
            Err = Traced<storage::Error>,
        > + Storage<Delete<By<Cart, ()>>, Ok = (), Err = Traced<storage::Error>>,
{
    type Ok = Order;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: Checkout) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Checkout {
            shipping_address,
            payment_method,
            shipping_method,
        } = cmd;

        let user = self
            .storage()
            .execute(Select(By::<Option<Credentials>, _>::unit()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::NotSignedIn))?
            .user;
        if user.role != user::Role::Client {
            return Err(tracerr::new!(E::NotClient));
        }

        let cart = self
            .storage()
            .execute(Select(By::<Option<Cart>, _>::unit()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .unwrap_or_default();
        if cart.is_empty() {
            return Err(tracerr::new!(E::EmptyCart));
        }
        shipping_address
            .validate()
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let order = self
            .api()
            .execute(Insert(order::Draft {
                items: cart.to_line_items(),
                currency: self.config().currency,
                shipping_address,
                payment_method,
                shipping_method,
                client_id: user.id,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        log::info!("placed `Order(id: {})` of {}", order.id, order.total());

        if let Err(e) =
            self.storage().execute(Delete(By::<Cart, _>::unit())).await
        {
            log::warn!(
                "failed to empty `Cart` after placing `Order(id: {})`: {e}",
                order.id,
            );
        }

        Ok(order)
    }
}

/// Error of [`Checkout`] [`Command`] execution.
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

    /// Signed-in user is not a client.
    #[display("Only clients can place orders")]
    #[from(ignore)]
    NotClient,

    /// [`Cart`] has no items.
    #[display("Cart is empty")]
    #[from(ignore)]
    EmptyCart,

    /// Shipping [`Address`] is incomplete.
    #[display("{_0}")]
    Address(IncompleteAddressError),
}
