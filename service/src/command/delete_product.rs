//! [`Command`] for deleting a [`Product`].

use common::operations::{By, Delete, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Product;
use crate::{
    domain::{
        product,
        user::{self, session::Credentials},
    },
    infra::{api, storage, Api, Storage},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Product`] by an admin.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeleteProduct {
    /// ID of the [`Product`] to delete.
    pub id: product::Id,
}

impl<A, S> Command<DeleteProduct> for Service<A, S>
where
    A: Api<Delete<product::Id>, Ok = (), Err = Traced<api::Error>>,
    S: Storage<
        Select<By<Option<Credentials>, ()>>,
        Ok = Option<Credentials>,
        Err = Traced<storage::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteProduct) -> Result<Self::Ok, Self::Err> {
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

        self.api()
            .execute(Delete(cmd.id))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`DeleteProduct`] [`Command`] execution.
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
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;
    use secrecy::SecretBox;

    use crate::{
        command::{Command as _, CreateSession},
        domain::Product,
        infra::api::{self, memory::State},
        spec::service,
    };

    use super::{DeleteProduct, ExecutionError};

    #[tokio::test]
    async fn allows_admins_only() {
        let api = api::Memory::new(State {
            products: vec![Product {
                id: "chair".into(),
                name: "Chair".parse().unwrap(),
                description: None,
                category: None,
                price: Decimal::from(500),
                stock: 1,
                supplier_id: None,
            }],
            ..api::memory::spec::api(vec![]).snapshot().await
        });
        let svc = service(api);
        drop(
            svc.execute(CreateSession {
                email: "supplier-1@acme.io".parse().unwrap(),
                password: SecretBox::new(Box::new("secret".into())),
            })
            .await
            .unwrap(),
        );

        let err = svc
            .execute(DeleteProduct { id: "chair".into() })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NotAdmin));
        assert_eq!(svc.api().snapshot().await.products.len(), 1);
    }
}
