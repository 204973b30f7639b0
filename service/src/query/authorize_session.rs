//! [`Query`] for authorizing the stored [`Session`].

use common::{
    operations::{By, Delete, Perform, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::user::session::{Credentials, Session},
    infra::{
        api::{self, Authenticate},
        storage, Api, Storage,
    },
    Service,
};

use super::Query;

/// [`Query`] for authorizing the [`Session`] of the stored [`Credentials`],
/// so the following [`Api`] requests are made on behalf of its [`User`].
///
/// Expired [`Credentials`] are forgotten.
#[derive(Clone, Copy, Debug)]
pub struct AuthorizeSession;

impl<A, S> Query<AuthorizeSession> for Service<A, S>
where
    A: Api<Perform<Authenticate>, Ok = (), Err = Traced<api::Error>>,
    S: Storage<
            Select<By<Option<Credentials>, ()>>,
            Ok = Option<Credentials>,
            Err = Traced<storage::Error>,
        > + Storage<
            Delete<By<Credentials, ()>>,
            Ok = (),
            Err = Traced<storage::Error>,
        >,
{
    type Ok = Credentials;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, _: AuthorizeSession) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let creds = self
            .storage()
            .execute(Select(By::<Option<Credentials>, _>::unit()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::NotSignedIn))?;

        match Session::decode(&creds.token) {
            Ok(session) if session.is_expired_at(DateTime::now()) => {
                log::info!("session of `User(id: {})` expired", creds.user.id);
                self.storage()
                    .execute(Delete(By::<Credentials, _>::unit()))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?;
                return Err(tracerr::new!(E::Expired));
            }
            Ok(_) => {}
            Err(e) => {
                log::debug!("token is not a JWT, its expiration is unknown: {e}");
            }
        }

        self.api()
            .execute(Perform(Authenticate(Some(creds.token.clone()))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(creds)
    }
}

/// Error of [`AuthorizeSession`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Api`] error.
    #[display("`Api` operation failed: {_0}")]
    Api(api::Error),

    /// [`Storage`] error.
    #[display("`Storage` operation failed: {_0}")]
    Storage(storage::Error),

    /// No [`Credentials`] are stored.
    #[display("Not signed in")]
    #[from(ignore)]
    NotSignedIn,

    /// Stored [`Session`] has expired.
    #[display("Session has expired, sign in again")]
    #[from(ignore)]
    Expired,
}
