//! engine::workspace
//!
//! Where a cycle happens: the directory the test command runs in, the
//! repository that contains it, and the configuration read from it.
//!
//! Each call opens or reads afresh. Nothing is kept between invocations.

use std::io;
use std::path::{Path, PathBuf};

use crate::core::config::{Config, ConfigError, CONFIG_FILE_NAME};
use crate::git::{Git, GitError, Repository};

/// Source of the repository and configuration for one invocation.
pub trait Workspace {
    /// Directory the test command runs in.
    fn dir(&self) -> &Path;

    /// Open the repository containing [`Workspace::dir`].
    fn open_repository(&self) -> Result<Box<dyn Repository>, GitError>;

    /// Read the configuration.
    fn load_config(&self) -> Result<Config, ConfigError>;
}

/// A directory on disk backed by git2.
#[derive(Debug, Clone)]
pub struct LocalWorkspace {
    dir: PathBuf,
    config_path: Option<PathBuf>,
}

impl LocalWorkspace {
    /// Workspace rooted at `dir`, reading `tcr.json` unless `config_path`
    /// says otherwise.
    pub fn new(dir: impl Into<PathBuf>, config_path: Option<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            config_path,
        }
    }
}

impl Workspace for LocalWorkspace {
    fn dir(&self) -> &Path {
        &self.dir
    }

    fn open_repository(&self) -> Result<Box<dyn Repository>, GitError> {
        Ok(Box::new(Git::open(&self.dir)?))
    }

    fn load_config(&self) -> Result<Config, ConfigError> {
        Config::load(&self.dir, self.config_path.as_deref())
    }
}

/// A workspace with a fixed repository and configuration.
///
/// `None` for either simulates it being absent.
#[derive(Debug, Clone)]
pub struct StaticWorkspace<R> {
    dir: PathBuf,
    repo: Option<R>,
    config: Option<Config>,
}

impl<R> StaticWorkspace<R>
where
    R: Repository + Clone + 'static,
{
    pub fn new(dir: impl Into<PathBuf>, repo: Option<R>, config: Option<Config>) -> Self {
        Self {
            dir: dir.into(),
            repo,
            config,
        }
    }
}

impl<R> Workspace for StaticWorkspace<R>
where
    R: Repository + Clone + 'static,
{
    fn dir(&self) -> &Path {
        &self.dir
    }

    fn open_repository(&self) -> Result<Box<dyn Repository>, GitError> {
        match &self.repo {
            Some(repo) => Ok(Box::new(repo.clone())),
            None => Err(GitError::NotARepo {
                path: self.dir.clone(),
            }),
        }
    }

    fn load_config(&self) -> Result<Config, ConfigError> {
        self.config.clone().ok_or_else(|| ConfigError::ReadError {
            path: self.dir.join(CONFIG_FILE_NAME),
            source: io::Error::new(io::ErrorKind::NotFound, "no configuration"),
        })
    }
}
