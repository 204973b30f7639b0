//! [`Context`] definitions.

use service::{
    domain::user::{session::Credentials, Role},
    query::{self, authorize_session},
    Query as _,
};

use crate::{define_error, AsError, Error, Service};

/// Context of a dashboard command.
#[derive(Clone, Debug)]
pub struct Context {
    /// [`Service`] the command is executed against.
    service: Service,
}

impl Context {
    /// Creates a new [`Context`] over the provided [`Service`].
    #[must_use]
    pub const fn new(service: Service) -> Self {
        Self { service }
    }

    /// Returns the [`Service`] of this [`Context`].
    #[must_use]
    pub const fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the [`Credentials`] of the signed-in user, authorizing the
    /// following API requests with them.
    ///
    /// # Errors
    ///
    /// If nobody is signed in, or the session has expired.
    pub async fn current_session(&self) -> Result<Credentials, Error> {
        self.service
            .execute(query::AuthorizeSession)
            .await
            .map_err(AsError::into_error)
    }

    /// Returns the [`Credentials`] of the signed-in user, if the user has
    /// one of the provided [`Role`]s.
    ///
    /// # Errors
    ///
    /// If nobody is signed in, the session has expired, or the user has
    /// none of the provided [`Role`]s.
    pub async fn require(&self, roles: &[Role]) -> Result<Credentials, Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_ROLE"]
                #[status = FORBIDDEN]
                #[message = "Screen is not available to the signed-in user"]
                WrongRole,
            }
        }

        let creds = self.current_session().await?;
        if roles.contains(&creds.user.role) {
            Ok(creds)
        } else {
            tracing::warn!(
                "`{}` {} opened a screen of {roles:?}",
                creds.user.role,
                creds.user.id,
            );
            Err(Error::WrongRole.into())
        }
    }
}

impl AsError for authorize_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NOT_SIGNED_IN"]
                #[status = UNAUTHORIZED]
                #[message = "Sign in first"]
                NotSignedIn,

                #[code = "SESSION_EXPIRED"]
                #[status = UNAUTHORIZED]
                #[message = "Session has expired, sign in again"]
                Expired,
            }
        }

        match self {
            Self::Api(e) => e.try_as_error(),
            Self::Storage(e) => e.try_as_error(),
            Self::NotSignedIn => Some(Error::NotSignedIn.into()),
            Self::Expired => Some(Error::Expired.into()),
        }
    }
}
