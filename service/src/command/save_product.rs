//! [`Command`] for saving a [`Product`].

use common::operations::{By, Insert, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        product,
        user::{self, session::Credentials},
        Product,
    },
    infra::{api, storage, Api, Storage},
    Service,
};

use super::Command;

/// [`Command`] for creating or updating a [`Product`] by an admin.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SaveProduct {
    /// Create a new [`Product`] out of the provided [`product::Draft`].
    Create(product::Draft),

    /// Replace an existing [`Product`].
    Update(Product),
}

impl<A, S> Command<SaveProduct> for Service<A, S>
where
    A: Api<Insert<product::Draft>, Ok = Product, Err = Traced<api::Error>>
        + Api<Update<Product>, Ok = Product, Err = Traced<api::Error>>,
    S: Storage<
        Select<By<Option<Credentials>, ()>>,
        Ok = Option<Credentials>,
        Err = Traced<storage::Error>,
    >,
{
    type Ok = Product;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SaveProduct) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let role = self
            .storage()
            .execute(Select(By::unit()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .map(|c| c.user.role);
        if role != Some(user::Role::Admin) {
            return Err(tracerr::new!(E::NotAdmin));
        }

        let price = match &cmd {
            SaveProduct::Create(draft) => draft.price,
            SaveProduct::Update(product) => product.price,
        };
        if price.is_sign_negative() {
            return Err(tracerr::new!(E::NegativePrice));
        }

        let product = match cmd {
            SaveProduct::Create(draft) => self.api().execute(Insert(draft)).await,
            SaveProduct::Update(product) => {
                self.api().execute(Update(product)).await
            }
        }
        .map_err(tracerr::map_from_and_wrap!(=> E))?;
        log::info!("saved `Product(id: {})`", product.id);

        Ok(product)
    }
}

/// Error of [`SaveProduct`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Api`] error.
    #[display("`Api` operation failed: {_0}")]
    Api(api::Error),

    /// [`Storage`] error.
    #[display("`Storage` operation failed: {_0}")]
    Storage(storage::Error),

    /// Signed-in user is not an admin.
    #[display("Only admins can manage products")]
    #[from(ignore)]
    NotAdmin,

    /// [`Product`] price is negative.
    #[display("Price cannot be negative")]
    #[from(ignore)]
    NegativePrice,
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;
    use secrecy::SecretBox;

    use crate::{
        command::{Command as _, CreateSession, DeleteProduct},
        domain::product,
        infra::api,
        spec::{service, TestService},
    };

    use super::{ExecutionError, SaveProduct};

    async fn signed_in(id: &str) -> TestService {
        let svc = service(api::memory::spec::api(vec![]));
        drop(
            svc.execute(CreateSession {
                email: format!("{id}@acme.io").parse().unwrap(),
                password: SecretBox::new(Box::new("secret".into())),
            })
            .await
            .unwrap(),
        );
        svc
    }

    fn draft(price: i64) -> product::Draft {
        product::Draft {
            name: "Desk".parse().unwrap(),
            description: None,
            category: None,
            price: Decimal::from(price),
            stock: 3,
            supplier_id: None,
        }
    }

    #[tokio::test]
    async fn creates_updates_and_deletes() {
        let svc = signed_in("admin-1").await;

        let mut product =
            svc.execute(SaveProduct::Create(draft(300))).await.unwrap();
        product.stock = 0;
        let updated = svc
            .execute(SaveProduct::Update(product.clone()))
            .await
            .unwrap();
        assert_eq!(updated, product);
        assert_eq!(svc.api().snapshot().await.products, vec![product.clone()]);

        svc.execute(DeleteProduct { id: product.id }).await.unwrap();
        assert!(svc.api().snapshot().await.products.is_empty());
    }

    #[tokio::test]
    async fn allows_admins_only() {
        let svc = signed_in("employee-1").await;

        let err = svc
            .execute(SaveProduct::Create(draft(300)))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NotAdmin));
    }

    #[tokio::test]
    async fn rejects_negative_price() {
        let svc = signed_in("admin-1").await;

        let err = svc
            .execute(SaveProduct::Create(draft(-1)))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NegativePrice));
    }
}
