//! In-[`Memory`] [`Storage`] implementation.

use std::sync::Arc;

use common::operations::{By, Delete, Select, Update};
use tokio::sync::Mutex;
use tracerr::Traced;

use super::{Document, Error, Slot, Storage};

/// [`Storage`] keeping its [`Document`] in memory, so nothing outlives the
/// process.
#[derive(Clone, Debug, Default)]
pub struct Memory(Arc<Mutex<Document>>);

impl Memory {
    /// Creates a new [`Memory`] [`Storage`] holding the provided
    /// [`Document`].
    #[must_use]
    pub fn with(doc: Document) -> Self {
        Self(Arc::new(Mutex::new(doc)))
    }

    /// Returns a copy of the currently held [`Document`].
    pub async fn snapshot(&self) -> Document {
        self.0.lock().await.clone()
    }
}

impl<T: Slot> Storage<Select<By<Option<T>, ()>>> for Memory {
    type Ok = Option<T>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Select<By<Option<T>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(T::slot(&mut *self.0.lock().await).clone())
    }
}

impl<T: Slot> Storage<Update<T>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Update(value): Update<T>,
    ) -> Result<Self::Ok, Self::Err> {
        *T::slot(&mut *self.0.lock().await) = Some(value);
        Ok(())
    }
}

impl<T: Slot> Storage<Delete<By<T, ()>>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Delete<By<T, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(T::slot(&mut *self.0.lock().await).take());
        Ok(())
    }
}
