//! [`Query`] definition.

pub mod authorize_session;
pub mod orders;
pub mod report;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    infra::{api, storage, Api, Storage},
    Service,
};

/// [`Query`] of the [`Service`].
pub use common::Handler as Query;

pub use self::authorize_session::AuthorizeSession;

/// [`Query`] [`Select`]ing a `T`ype from an [`Api`].
#[derive(Clone, Copy, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct ApiQuery<T>(T);

impl<W, B> ApiQuery<By<W, B>> {
    /// Creates a new [`ApiQuery`] selecting a `W` by the provided `B`.
    #[must_use]
    pub fn by(by: B) -> Self {
        Self(By::new(by))
    }
}

impl<W> ApiQuery<By<W, ()>> {
    /// Creates a new [`ApiQuery`] selecting every `W` there is.
    #[must_use]
    pub fn all() -> Self {
        Self(By::unit())
    }
}

impl<A, S, W, B> Query<ApiQuery<By<W, B>>> for Service<A, S>
where
    A: Api<Select<By<W, B>>, Ok = W, Err = Traced<api::Error>>,
{
    type Ok = W;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        ApiQuery(by): ApiQuery<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.api().execute(Select(by)).await.map_err(tracerr::wrap!())
    }
}

/// [`Query`] [`Select`]ing a `T`ype from a [`Storage`].
#[derive(Clone, Copy, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct StorageQuery<T>(T);

impl<W> StorageQuery<By<W, ()>> {
    /// Creates a new [`StorageQuery`] selecting the stored `W`.
    #[must_use]
    pub fn stored() -> Self {
        Self(By::unit())
    }
}

impl<A, S, W, B> Query<StorageQuery<By<W, B>>> for Service<A, S>
where
    S: Storage<Select<By<W, B>>, Ok = W, Err = Traced<storage::Error>>,
{
    type Ok = W;
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        StorageQuery(by): StorageQuery<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.storage()
            .execute(Select(by))
            .await
            .map_err(tracerr::wrap!())
    }
}
