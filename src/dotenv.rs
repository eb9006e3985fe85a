//! `.env` loading.
//!
//! The file is read before argument parsing so clap's `env` defaults see its
//! values. Logging isn't initialised yet at that point, so the outcome is
//! returned and logged afterwards.

use std::path::{Path, PathBuf};

/// What happened when looking for a `.env` file.
#[derive(Debug)]
pub enum DotenvStatus {
    /// Variables were loaded from this file
    Loaded(PathBuf),
    /// No `.env` file was found; not an error
    NotFound,
    /// An explicitly named file does not exist
    Missing(PathBuf),
    /// A file was found but could not be parsed
    Invalid(dotenvy::Error),
}

impl DotenvStatus {
    fn from_result(result: Result<PathBuf, dotenvy::Error>) -> Self {
        match result {
            Ok(path) => Self::Loaded(path),
            Err(e) if e.not_found() => Self::NotFound,
            Err(e) => Self::Invalid(e),
        }
    }

    /// Log the outcome; a malformed or missing named file is a warning.
    pub fn log(&self) {
        match self {
            Self::Loaded(path) => log::debug!("loaded environment from {}", path.display()),
            Self::NotFound => log::debug!("no .env file found"),
            Self::Missing(path) => log::warn!("env file {} does not exist", path.display()),
            Self::Invalid(e) => log::warn!("failed to load .env file: {e}"),
        }
    }
}

/// Load `.env` from the current directory or its ancestors.
///
/// Variables already set in the environment take precedence.
pub fn load() -> DotenvStatus {
    DotenvStatus::from_result(dotenvy::dotenv())
}

/// Load a specific env file.
pub fn load_from(path: &Path) -> DotenvStatus {
    match DotenvStatus::from_result(dotenvy::from_path(path).map(|()| path.to_path_buf())) {
        DotenvStatus::NotFound => DotenvStatus::Missing(path.to_path_buf()),
        status => status,
    }
}
