//! [`Command`] for changing the quantity of a [`Cart`] item.

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

/// [`Command`] for setting the quantity of a [`Product`] in the [`Cart`].
///
/// Zero quantity removes the [`Product`] from the [`Cart`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpdateCartItem {
    /// ID of the [`Product`] to update.
    pub product_id: product::Id,

    /// New number of units.
    pub quantity: u32,
}

impl<A, S> Command<UpdateCartItem> for Service<A, S>
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
        cmd: UpdateCartItem,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateCartItem {
            product_id,
            quantity,
        } = cmd;

        let mut cart = self
            .storage()
            .execute(Select(By::unit()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .unwrap_or_default();
        if !cart.set_quantity(&product_id, quantity) {
            return Err(tracerr::new!(E::NotInCart(product_id)));
        }

        self.storage()
            .execute(Update(cart.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(cart)
    }
}

/// Error of [`UpdateCartItem`] [`Command`] execution.
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
    use rust_decimal::Decimal;

    use crate::{
        command::{add_to_cart::spec::catalog, AddToCart, Command as _},
        domain::Cart,
    };

    use super::{ExecutionError, UpdateCartItem};

    #[tokio::test]
    async fn recomputes_subtotal() {
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
            .execute(UpdateCartItem {
                product_id: "chair".into(),
                quantity: 5,
            })
            .await
            .unwrap();
        assert_eq!(cart.subtotal(), Decimal::from(2500));
        assert_eq!(cart.subtotal(), cart.subtotal());

        let cart = svc
            .execute(UpdateCartItem {
                product_id: "chair".into(),
                quantity: 0,
            })
            .await
            .unwrap();
        assert_eq!(cart, Cart::default());
    }

    #[tokio::test]
    async fn rejects_missing_item() {
        let svc = catalog().await;

        let err = svc
            .execute(UpdateCartItem {
                product_id: "chair".into(),
                quantity: 1,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NotInCart(_)));
    }
}
