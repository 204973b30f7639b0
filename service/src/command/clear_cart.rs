//! [`Command`] for emptying the [`Cart`].

use common::operations::{By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::Cart,
    infra::{storage, Storage},
    Service,
};

use super::Command;

/// [`Command`] for removing every item from the [`Cart`].
#[derive(Clone, Copy, Debug)]
pub struct ClearCart;

impl<A, S> Command<ClearCart> for Service<A, S>
where
    S: Storage<Delete<By<Cart, ()>>, Ok = (), Err = Traced<storage::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, _: ClearCart) -> Result<Self::Ok, Self::Err> {
        self.storage()
            .execute(Delete(By::unit()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))
    }
}

/// Error of [`ClearCart`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Storage`] error.
    #[display("`Storage` operation failed: {_0}")]
    Storage(storage::Error),
}
