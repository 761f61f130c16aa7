pub mod collection;
pub mod model;

use collection::{Collection, StoreError};
use model::{Bloc, Session, User};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// The three collections of the catalogue, rooted at one data directory.
/// Shared as an `Arc` through the HTTP layer.
pub struct Catalogue {
    data_dir: PathBuf,
    pub blocs: Collection<Bloc>,
    pub users: Collection<User>,
    pub sessions: Collection<Session>,
}

impl Catalogue {
    pub fn new(data_dir: &Path) -> Self {
        Catalogue {
            data_dir: data_dir.to_path_buf(),
            blocs: Collection::new(data_dir, "blocs"),
            users: Collection::new(data_dir, "users"),
            sessions: Collection::new(data_dir, "sessions"),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub async fn ensure_data_dir(&self) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        Ok(())
    }

    /// The store is reachable when its data directory exists and is a
    /// directory.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let metadata = tokio::fs::metadata(&self.data_dir).await?;
        if !metadata.is_dir() {
            return Err(StoreError::Io(std::io::Error::new(
                ErrorKind::Other,
                format!("{} is not a directory", self.data_dir.display()),
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn ping_succeeds_once_the_data_dir_exists() {
        let dir = tempfile::tempdir().unwrap();
        let catalogue = Catalogue::new(&dir.path().join("store"));

        assert!(catalogue.ping().await.is_err());

        catalogue.ensure_data_dir().await.unwrap();
        assert!(catalogue.ping().await.is_ok());
    }

    #[tokio::test]
    async fn collections_live_under_the_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let catalogue = Catalogue::new(dir.path());

        assert_eq!(catalogue.blocs.path(), dir.path().join("blocs.json"));
        assert_eq!(catalogue.users.path(), dir.path().join("users.json"));
        assert_eq!(catalogue.sessions.path(), dir.path().join("sessions.json"));
    }
}
