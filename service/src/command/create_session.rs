//! [`Command`] for creating a [`Session`].

use common::operations::{Perform, Update};
use derive_more::{Display, Error, From};
use secrecy::SecretBox;
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{user::Session, User};
use crate::{
    domain::user::{self, session::Credentials},
    infra::{
        api::{self, Authenticate, Login},
        storage, Api, Storage,
    },
    Service,
};

use super::Command;

/// [`Command`] for creating a [`Session`] by [`User`] credentials.
///
/// The issued [`Credentials`] are persisted, so the following runs stay
/// signed in.
#[derive(Debug)]
pub struct CreateSession {
    /// [`user::Email`] of the [`User`].
    pub email: user::Email,

    /// [`user::Password`] of the [`User`].
    pub password: SecretBox<user::Password>,
}

impl<A, S> Command<CreateSession> for Service<A, S>
where
    A: Api<Perform<Login>, Ok = Credentials, Err = Traced<api::Error>>
        + Api<Perform<Authenticate>, Ok = (), Err = Traced<api::Error>>,
    S: Storage<Update<Credentials>, Ok = (), Err = Traced<storage::Error>>,
{
    type Ok = Credentials;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateSession { email, password } = cmd;

        let creds = self
            .api()
            .execute(Perform(Login { email, password }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        self.storage()
            .execute(Update(creds.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        self.api()
            .execute(Perform(Authenticate(Some(creds.token.clone()))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(creds)
    }
}

/// Error of [`CreateSession`] [`Command`] execution.
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
    use common::operations::{By, Select};
    use secrecy::SecretBox;

    use crate::{
        command::Command as _,
        domain::{user::session::Credentials, user::Role},
        infra::{api, Storage as _},
        spec::service,
    };

    use super::CreateSession;

    #[tokio::test]
    async fn stores_credentials() {
        let svc = service(api::memory::spec::api(vec![]));

        let creds = svc
            .execute(CreateSession {
                email: "employee-1@acme.io".parse().unwrap(),
                password: SecretBox::new(Box::new("secret".into())),
            })
            .await
            .unwrap();

        assert_eq!(creds.user.role, Role::Employee);
        assert_eq!(
            svc.storage()
                .execute(Select(By::<Option<Credentials>, _>::unit()))
                .await
                .unwrap(),
            Some(creds),
        );
    }

    #[tokio::test]
    async fn stores_nothing_on_wrong_password() {
        let svc = service(api::memory::spec::api(vec![]));

        let res = svc
            .execute(CreateSession {
                email: "employee-1@acme.io".parse().unwrap(),
                password: SecretBox::new(Box::new("wrong".into())),
            })
            .await;

        assert!(res.is_err());
        assert_eq!(svc.storage().snapshot().await.credentials, None);
    }
}
