use serde::{de::DeserializeOwned, Serialize};
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;

type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access collection file")]
    Io(#[from] std::io::Error),
    #[error("failed to deserialize collection data")]
    Deserialize(#[from] serde_json::Error),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
}

/// One JSON-file collection of documents. Mutations go through [`update`]
/// which serializes read-modify-write cycles behind a lock; the file itself
/// is replaced with a rename so readers never observe a torn write.
///
/// [`update`]: Collection::update
pub struct Collection<D> {
    path: PathBuf,
    lock: Mutex<()>,
    _marker: PhantomData<D>,
}

impl<D> Collection<D>
where
    D: Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(data_dir: &Path, name: &str) -> Self {
        Collection {
            path: data_dir.join(format!("{}.json", name)),
            lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole collection. A collection file that does not exist yet
    /// is an empty collection, not an error.
    pub async fn load(&self) -> Result<Vec<D>> {
        self.read_documents().await
    }

    /// Replaces the whole collection.
    pub async fn save(&self, documents: &[D]) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.persist(documents).await
    }

    /// Atomic read-modify-write: loads the collection, applies `apply`, and
    /// persists the result, all under the mutation lock. When `apply` fails
    /// nothing is written and the error propagates unchanged.
    pub async fn update<F, T, E>(&self, apply: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut Vec<D>) -> std::result::Result<T, E>,
        E: From<StoreError>,
    {
        let _guard = self.lock.lock().await;
        let mut documents = self.read_documents().await.map_err(E::from)?;
        let value = apply(&mut documents)?;
        self.persist(&documents).await.map_err(E::from)?;

        Ok(value)
    }

    async fn read_documents(&self) -> Result<Vec<D>> {
        match tokio::fs::read(&self.path).await {
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn persist(&self, documents: &[D]) -> Result<()> {
        let data = serde_json::to_vec_pretty(documents)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &data).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        id: String,
        value: u32,
    }

    fn doc(id: &str, value: u32) -> Doc {
        Doc {
            id: String::from(id),
            value,
        }
    }

    #[tokio::test]
    async fn missing_file_loads_as_an_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let collection: Collection<Doc> = Collection::new(dir.path(), "docs");

        assert_eq!(collection.load().await.unwrap(), Vec::new());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let collection: Collection<Doc> = Collection::new(dir.path(), "docs");

        collection
            .save(&[doc("a", 1), doc("b", 2)])
            .await
            .unwrap();

        assert_eq!(
            collection.load().await.unwrap(),
            vec![doc("a", 1), doc("b", 2)]
        );
    }

    #[tokio::test]
    async fn update_applies_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let collection: Collection<Doc> = Collection::new(dir.path(), "docs");
        collection.save(&[doc("a", 1)]).await.unwrap();

        let count = collection
            .update(|docs| -> Result<usize> {
                docs.push(doc("b", 2));
                Ok(docs.len())
            })
            .await
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(collection.load().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failed_update_leaves_the_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let collection: Collection<Doc> = Collection::new(dir.path(), "docs");
        collection.save(&[doc("a", 1)]).await.unwrap();

        let result = collection
            .update(|docs| -> Result<()> {
                docs.clear();
                Err(StoreError::NotFound(String::from("doc x")))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(collection.load().await.unwrap(), vec![doc("a", 1)]);
    }

    #[tokio::test]
    async fn corrupt_file_is_a_deserialize_error() {
        let dir = tempfile::tempdir().unwrap();
        let collection: Collection<Doc> = Collection::new(dir.path(), "docs");
        tokio::fs::write(collection.path(), b"{ not json")
            .await
            .unwrap();

        assert!(matches!(
            collection.load().await,
            Err(StoreError::Deserialize(_))
        ));
    }
}
