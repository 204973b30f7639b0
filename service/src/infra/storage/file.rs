//! JSON [`File`] [`Storage`] implementation.

use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use common::operations::{By, Delete, Select, Update};
use tokio::{fs, sync::Mutex};
use tracerr::Traced;
use tracing as log;

use super::{Document, Error, Slot, Storage};

/// [`Storage`] keeping a single JSON [`Document`] in a file.
///
/// Every operation reads, modifies and writes the whole [`Document`] while
/// holding an in-process lock, and a new [`Document`] replaces the old one
/// atomically through a temporary file. Separate processes sharing the same
/// file may still overwrite each other's changes.
#[derive(Clone, Debug)]
pub struct File {
    /// Path to the file.
    path: Arc<PathBuf>,

    /// Lock serializing accesses to the file.
    lock: Arc<Mutex<()>>,
}

impl File {
    /// Creates a new [`File`] [`Storage`] at the provided `path`.
    ///
    /// The file is not touched until the first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the path to the file of this [`Storage`].
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the [`Document`] from the file.
    ///
    /// A missing or empty file is an empty [`Document`].
    async fn read(&self) -> Result<Document, Traced<Error>> {
        let bytes = match fs::read(self.path()).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(Document::default());
            }
            Err(e) => return Err(tracerr::new!(Error::Io(e))),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Document::default());
        }
        serde_json::from_slice(&bytes)
            .map_err(tracerr::from_and_wrap!(=> Error))
    }

    /// Writes the provided [`Document`] into the file, replacing it at once.
    async fn write(&self, doc: &Document) -> Result<(), Traced<Error>> {
        let bytes = serde_json::to_vec_pretty(doc)
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        if let Some(dir) =
            self.path().parent().filter(|d| !d.as_os_str().is_empty())
        {
            fs::create_dir_all(dir)
                .await
                .map_err(tracerr::from_and_wrap!(=> Error))?;
        }

        let mut tmp = self.path().as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, bytes)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        fs::rename(&tmp, self.path())
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        log::debug!("storage `{}` updated", self.path().display());
        Ok(())
    }

    /// Applies the provided modification to the stored [`Document`].
    async fn modify<T>(
        &self,
        f: impl FnOnce(&mut Document) -> T,
    ) -> Result<T, Traced<Error>> {
        let _guard = self.lock.lock().await;

        let mut doc = self.read().await.map_err(tracerr::wrap!())?;
        let out = f(&mut doc);
        self.write(&doc).await.map_err(tracerr::wrap!())?;
        Ok(out)
    }
}

impl<T: Slot> Storage<Select<By<Option<T>, ()>>> for File {
    type Ok = Option<T>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Select<By<Option<T>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let _guard = self.lock.lock().await;

        let mut doc = self.read().await.map_err(tracerr::wrap!())?;
        Ok(T::slot(&mut doc).take())
    }
}

impl<T: Slot> Storage<Update<T>> for File {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Update(value): Update<T>,
    ) -> Result<Self::Ok, Self::Err> {
        self.modify(|doc| *T::slot(doc) = Some(value))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<T: Slot> Storage<Delete<By<T, ()>>> for File {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Delete<By<T, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.modify(|doc| drop(T::slot(doc).take()))
            .await
            .map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Delete, Select, Update};

    use crate::{
        domain::{
            cart,
            user::session::{Credentials, Token},
            Cart, User,
        },
        infra::Storage as _,
    };

    use super::File;

    fn tmp_path() -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("dashboard-{}", uuid::Uuid::new_v4()))
            .join("storage.json")
    }

    fn credentials() -> Credentials {
        Credentials {
            token: Token::new("jwt").unwrap(),
            user: User {
                id: "u-1".into(),
                name: "Jane Doe".parse().unwrap(),
                email: "jane@acme.io".parse().unwrap(),
                role: crate::domain::user::Role::Client,
                phone: None,
                company: None,
            },
        }
    }

    #[tokio::test]
    async fn reads_nothing_from_missing_file() {
        let storage = File::new(tmp_path());

        let creds = storage
            .execute(Select(By::<Option<Credentials>, _>::unit()))
            .await
            .unwrap();

        assert_eq!(creds, None);
    }

    #[tokio::test]
    async fn keeps_slots_independent() {
        let path = tmp_path();
        let storage = File::new(&path);
        let mut cart = Cart::default();
        cart.add(cart::spec::item("chair", 2, 500));

        storage.execute(Update(credentials())).await.unwrap();
        storage.execute(Update(cart.clone())).await.unwrap();
        storage
            .execute(Delete(By::<Credentials, _>::unit()))
            .await
            .unwrap();

        let reopened = File::new(&path);
        assert_eq!(
            reopened
                .execute(Select(By::<Option<Credentials>, _>::unit()))
                .await
                .unwrap(),
            None,
        );
        assert_eq!(
            reopened
                .execute(Select(By::<Option<Cart>, _>::unit()))
                .await
                .unwrap(),
            Some(cart),
        );
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn serializes_concurrent_writers() {
        let storage = File::new(tmp_path());
        storage.execute(Update(credentials())).await.unwrap();

        let writes = (0..8).map(|n| {
            let storage = storage.clone();
            async move {
                let mut cart = Cart::default();
                cart.add(cart::spec::item(&format!("p{n}"), 1, 10));
                storage.execute(Update(cart)).await
            }
        });
        for res in futures::future::join_all(writes).await {
            res.unwrap();
        }

        assert_eq!(
            storage
                .execute(Select(By::<Option<Credentials>, _>::unit()))
                .await
                .unwrap(),
            Some(credentials()),
        );
        assert_eq!(
            storage
                .execute(Select(By::<Option<Cart>, _>::unit()))
                .await
                .unwrap()
                .map(|c| c.len()),
            Some(1),
        );
    }

    #[tokio::test]
    async fn rejects_malformed_document() {
        let path = tmp_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();

        let res = File::new(&path)
            .execute(Select(By::<Option<Cart>, _>::unit()))
            .await;

        assert!(res.is_err());
    }
}
