//! [`Command`] for adding a [`Product`] to the [`Cart`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{cart, order::Quantity, product, Cart, Product},
    infra::{api, storage, Api, Storage},
    Service,
};

use super::Command;

/// [`Command`] for adding a [`Product`] to the [`Cart`].
///
/// The current [`Product`] name and price are taken from the [`Api`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddToCart {
    /// ID of the [`Product`] to add.
    pub product_id: product::Id,

    /// Number of units to add.
    pub quantity: u32,
}

impl<A, S> Command<AddToCart> for Service<A, S>
where
    A: Api<
        Select<By<Option<Product>, product::Id>>,
        Ok = Option<Product>,
        Err = Traced<api::Error>,
    >,
    S: Storage<
            Select<By<Option<Cart>, ()>>,
            Ok = Option<Cart>,
            Err = Traced<storage::Error>,
        > + Storage<Update<Cart>, Ok = (), Err = Traced<storage::Error>>,
{
    type Ok = Cart;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: AddToCart) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AddToCart {
            product_id,
            quantity,
        } = cmd;

        let quantity = Quantity::new(quantity)
            .ok_or_else(|| tracerr::new!(E::ZeroQuantity))?;

        let product = self
            .api()
            .execute(Select(By::new(product_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::ProductNotExists(product_id)))?;
        if !product.is_in_stock() {
            return Err(tracerr::new!(E::OutOfStock(product.id)));
        }

        let mut cart = self
            .storage()
            .execute(Select(By::unit()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .unwrap_or_default();
        cart.add(cart::Item::of(&product, quantity));

        self.storage()
            .execute(Update(cart.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(cart)
    }
}

/// Error of [`AddToCart`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Api`] error.
    #[display("`Api` operation failed: {_0}")]
    Api(api::Error),

    /// [`Storage`] error.
    #[display("`Storage` operation failed: {_0}")]
    Storage(storage::Error),

    /// [`Product`] with the provided ID does not exist.
    #[display("`Product(id: {_0})` does not exist")]
    #[from(ignore)]
    ProductNotExists(#[error(not(source))] product::Id),

    /// [`Product`] with the provided ID is out of stock.
    #[display("`Product(id: {_0})` is out of stock")]
    #[from(ignore)]
    OutOfStock(#[error(not(source))] product::Id),

    /// Zero units are requested.
    #[display("Quantity must be positive")]
    #[from(ignore)]
    ZeroQuantity,
}

#[cfg(test)]
pub(crate) mod spec {
    use rust_decimal::Decimal;
    use secrecy::SecretBox;

    use crate::{
        command::{Command as _, CreateSession},
        domain::Product,
        infra::api::{self, memory::State},
        spec::{service, TestService},
    };

    use super::{AddToCart, ExecutionError};

    /// Creates a [`TestService`] signed in as a client, with a chair in
    /// stock and a lamp out of stock.
    pub(crate) async fn catalog() -> TestService {
        let product = |id: &str, price: i64, stock: u32| Product {
            id: id.into(),
            name: id.to_uppercase().parse().unwrap(),
            description: None,
            category: Some("Furniture".into()),
            price: Decimal::from(price),
            stock,
            supplier_id: None,
        };
        let api = api::Memory::new(State {
            products: vec![product("chair", 500, 10), product("lamp", 40, 0)],
            ..api::memory::spec::api(vec![]).snapshot().await
        });
        let svc = service(api);
        drop(
            svc.execute(CreateSession {
                email: "client-1@acme.io".parse().unwrap(),
                password: SecretBox::new(Box::new("secret".into())),
            })
            .await
            .unwrap(),
        );
        svc
    }

    #[tokio::test]
    async fn merges_same_product() {
        let svc = catalog().await;

        drop(
            svc.execute(AddToCart {
                product_id: "chair".into(),
                quantity: 1,
            })
            .await
            .unwrap(),
        );
        let cart = svc
            .execute(AddToCart {
                product_id: "chair".into(),
                quantity: 2,
            })
            .await
            .unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.units(), 3);
        assert_eq!(cart.subtotal(), Decimal::from(1500));
        assert_eq!(svc.storage().snapshot().await.cart, Some(cart));
    }

    #[tokio::test]
    async fn rejects_unavailable_products() {
        let svc = catalog().await;

        let out_of_stock = svc
            .execute(AddToCart {
                product_id: "lamp".into(),
                quantity: 1,
            })
            .await
            .unwrap_err();
        let unknown = svc
            .execute(AddToCart {
                product_id: "sofa".into(),
                quantity: 1,
            })
            .await
            .unwrap_err();
        let zero = svc
            .execute(AddToCart {
                product_id: "chair".into(),
                quantity: 0,
            })
            .await
            .unwrap_err();

        assert!(matches!(out_of_stock.as_ref(), ExecutionError::OutOfStock(_)));
        assert!(matches!(unknown.as_ref(), ExecutionError::ProductNotExists(_)));
        assert!(matches!(zero.as_ref(), ExecutionError::ZeroQuantity));
        assert_eq!(svc.storage().snapshot().await.cart, None);
    }
}
