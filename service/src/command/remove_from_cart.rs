//! [`Command`] for removing a [`Product`] from the [`Cart`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Product;
use crate::{
    domain::{product, Cart},
    infra::{storage, Storage},
    Service,
};

use super::Command;

/// [`Command`] for removing a [`Product`] from the [`Cart`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RemoveFromCart {
    /// ID of the [`Product`] to remove.
    pub product_id: product::Id,
}

impl<A, S> Command<RemoveFromCart> for Service<A, S>
where
    S: Storage<
            Select<By<Option<Cart>, ()>>,
            Ok = Option<Cart>,
            Err = Traced<storage::Error>,
        > + Storage<Update<Cart>, Ok = (), Err = Traced<storage::Error>>,
{
    type Ok = Cart;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RemoveFromCart,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RemoveFromCart { product_id } = cmd;

        let mut cart = self
            .storage()
            .execute(Select(By::unit()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .unwrap_or_default();
        if !cart.remove(&product_id) {
            return Err(tracerr::new!(E::NotInCart(product_id)));
        }

        self.storage()
            .execute(Update(cart.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(cart)
    }
}

/// Error of [`RemoveFromCart`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Storage`] error.
    #[display("`Storage` operation failed: {_0}")]
    Storage(storage::Error),

    /// [`Product`] with the provided ID is not in the [`Cart`].
    #[display("`Product(id: {_0})` is not in the cart")]
    #[from(ignore)]
    NotInCart(#[error(not(source))] product::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::{add_to_cart::spec::catalog, AddToCart, Command as _},
        domain::Cart,
    };

    use super::{ExecutionError, RemoveFromCart};

    #[tokio::test]
    async fn removes_item_once() {
        let svc = catalog().await;
        drop(
            svc.execute(AddToCart {
                product_id: "chair".into(),
                quantity: 2,
            })
            .await
            .unwrap(),
        );

        let cart = svc
            .execute(RemoveFromCart {
                product_id: "chair".into(),
            })
            .await
            .unwrap();
        assert_eq!(cart, Cart::default());
        assert_eq!(svc.storage().snapshot().await.cart, Some(Cart::default()));

        let err = svc
            .execute(RemoveFromCart {
                product_id: "chair".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::NotInCart(_)));
    }
}
