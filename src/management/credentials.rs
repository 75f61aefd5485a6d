use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::{
    config,
    error::{Error, Result},
    spotify::Session,
    types::Token,
};

/// On-disk home of the single stored access token.
///
/// Written by `pixlist auth`, removed by `pixlist logout`. Each write
/// replaces the whole file, there is no read-modify-write.
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_dir>/credentials.json`
    pub fn default_location() -> Self {
        Self::new(config::data_dir().join("credentials.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Token> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::NotLoggedIn),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    /// Builds the session every API call of this run will use.
    pub async fn session(&self) -> Result<Session> {
        Ok(Session::from(&self.load().await?))
    }

    pub async fn persist(&self, token: &Token) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Forgets the stored token. Returns `false` when nothing was stored.
    pub async fn clear(&self) -> Result<bool> {
        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
