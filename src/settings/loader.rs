//! Reads the settings layers from the content root and the process environment.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::{resolve, Settings};
use crate::error::SettingsError;

/// Base settings file name.
pub const BASE_FILE: &str = "settings.json";

/// Untracked settings file holding values that must not be committed.
pub const PRIVATE_FILE: &str = "settings.private.json";

/// Change detection state of the settings files: SHA-256 of each file's
/// contents, `None` for files that do not exist or cannot be read.
pub type Fingerprint = Vec<Option<Vec<u8>>>;

/// Locates and loads the settings layers for one environment.
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    content_root: PathBuf,
    environment: String,
}

impl SettingsLoader {
    /// Create a loader reading from `content_root` for the named environment
    /// (e.g. `development`, `production`).
    pub fn new(content_root: impl Into<PathBuf>, environment: impl Into<String>) -> Self {
        Self {
            content_root: content_root.into(),
            environment: environment.into(),
        }
    }

    /// Directory the settings files are read from.
    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    /// Name of the environment-specific layer.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Paths of the three file layers, lowest precedence first.
    pub fn layer_paths(&self) -> [PathBuf; 3] {
        [
            self.content_root.join(BASE_FILE),
            self.content_root
                .join(format!("settings.{}.json", self.environment)),
            self.content_root.join(PRIVATE_FILE),
        ]
    }

    /// Resolve the settings from disk and the current process environment.
    pub fn load(&self) -> Result<Settings, SettingsError> {
        let env = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
        self.load_with_env(env)
    }

    /// Resolve the settings from disk and the given environment variables.
    pub fn load_with_env<I, K, V>(&self, process_env: I) -> Result<Settings, SettingsError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let [base, environment, private] = self.layer_paths();

        let base = read_optional(&base)?;
        let environment = read_optional(&environment)?;
        let private = read_optional(&private)?;

        resolve(
            base.as_deref(),
            environment.as_deref(),
            private.as_deref(),
            process_env,
        )
    }

    /// Digest the contents of every settings file.
    ///
    /// Any content change is detected, including same-length rewrites that
    /// leave the modification time unchanged.
    pub fn fingerprint(&self) -> Fingerprint {
        self.layer_paths()
            .iter()
            .map(|path| {
                std::fs::read(path)
                    .ok()
                    .map(|content| Sha256::digest(&content).to_vec())
            })
            .collect()
    }
}

/// Read a settings file, treating a missing file as an absent layer.
fn read_optional(path: &Path) -> Result<Option<String>, SettingsError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            debug!(path = %path.display(), "Loaded settings layer");
            Ok(Some(content))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(SettingsError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
