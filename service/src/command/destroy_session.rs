//! [`Command`] for destroying the current [`Session`].

use common::operations::{By, Delete, Perform};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::user::Session;
use crate::{
    domain::user::session::Credentials,
    infra::{
        api::{self, Authenticate, Logout},
        storage, Api, Storage,
    },
    Service,
};

use super::Command;

/// [`Command`] for destroying the current [`Session`].
///
/// The stored [`Credentials`] are forgotten even if the [`Api`] fails to
/// sign out, while the stored cart is kept.
#[derive(Clone, Copy, Debug)]
pub struct DestroySession;

impl<A, S> Command<DestroySession> for Service<A, S>
where
    A: Api<Perform<Logout>, Ok = (), Err = Traced<api::Error>>
        + Api<Perform<Authenticate>, Ok = (), Err = Traced<api::Error>>,
    S: Storage<Delete<By<Credentials, ()>>, Ok = (), Err = Traced<storage::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, _: DestroySession) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        if let Err(e) = self.api().execute(Perform(Logout)).await {
            log::warn!("failed to sign out remotely: {e}");
        }

        self.storage()
            .execute(Delete(By::unit()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        self.api()
            .execute(Perform(Authenticate(None)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`DestroySession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Api`] error.
    #[display("`Api` operation failed: {_0}")]
    Api(api::Error),

    /// [`Storage`] error.
    #[display("`Storage` operation failed: {_0}")]
    Storage(storage::Error),
}

#[cfg(test)]
mod spec {
    use secrecy::SecretBox;

    use crate::{
        command::{Command as _, CreateSession},
        domain::Cart,
        infra::{api, Storage as _},
        spec::service,
    };

    use super::DestroySession;

    #[tokio::test]
    async fn forgets_credentials_but_keeps_cart() {
        let svc = service(api::memory::spec::api(vec![]));
        drop(
            svc.execute(CreateSession {
                email: "client-1@acme.io".parse().unwrap(),
                password: SecretBox::new(Box::new("secret".into())),
            })
            .await
            .unwrap(),
        );
        svc.storage()
            .execute(common::operations::Update(Cart::default()))
            .await
            .unwrap();

        svc.execute(DestroySession).await.unwrap();

        let doc = svc.storage().snapshot().await;
        assert_eq!(doc.credentials, None);
        assert_eq!(doc.cart, Some(Cart::default()));
    }

    #[tokio::test]
    async fn succeeds_when_not_signed_in() {
        let svc = service(api::memory::spec::api(vec![]));

        svc.execute(DestroySession).await.unwrap();
    }
}
