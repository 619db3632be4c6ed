//! Layered settings resolution.
//!
//! The service reads its application settings from four ordered layers:
//!
//! ```text
//! ┌───────────────────────────────┐  highest precedence
//! │   process environment vars    │
//! ├───────────────────────────────┤
//! │   settings.private.json       │  untracked, never committed
//! ├───────────────────────────────┤
//! │   settings.<environment>.json │
//! ├───────────────────────────────┤
//! │   settings.json               │
//! └───────────────────────────────┘  lowest precedence
//! ```
//!
//! Each JSON layer is parsed with the `config` crate and flattened into
//! lowercase dotted keys (`{"AWS": {"Region": ..}}` becomes `aws.region`).
//! Environment variable names map to the same keys directly (`AWS__REGION`). Layers are then
//! overlaid in order, so the last writer of a key wins and values are always
//! replaced whole.
//!
//! [`resolve`] is pure: the loader in [`SettingsLoader`] does the file and
//! environment I/O and hands the raw contents over.

mod loader;
mod reload;

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::SettingsError;

pub use loader::{Fingerprint, SettingsLoader, BASE_FILE, PRIVATE_FILE};
pub use reload::{spawn_reloader, SettingsHandle};

// =============================================================================
// Named Keys
// =============================================================================

/// S3 bucket holding the object served through presigned links.
pub const BUCKET_KEY: &str = "AppS3Bucket";

/// Destination SQS queue URL.
pub const QUEUE_URL_KEY: &str = "AppQueueUrl";

/// AWS region for both clients.
pub const REGION_KEY: &str = "AWS.Region";

/// Value echoed by the configuration query endpoint.
pub const ENVIRONMENT_OVERRIDE_KEY: &str = "EnvironmentOverride";

/// Standard AWS region variable, consulted when `AWS.Region` is unset.
pub const REGION_ENV_KEY: &str = "AWS_REGION";

/// Region used when neither the settings nor the environment name one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Separator between nesting levels in environment variable names.
pub const ENV_NESTING_SEPARATOR: &str = "__";

// =============================================================================
// Settings View
// =============================================================================

/// Immutable, fully merged settings view.
///
/// Keys are case-insensitive. A lookup for a key no layer defines returns
/// `None`; defaults only come from an explicit fallback at the call site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    entries: BTreeMap<String, String>,
}

impl Settings {
    /// Look up a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&normalize_key(key))
            .map(String::as_str)
    }

    /// Look up a key, falling back to `fallback` when it is absent.
    pub fn get_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.get(key).unwrap_or(fallback)
    }

    /// Look up a key that the calling operation cannot proceed without.
    ///
    /// An empty value counts as missing.
    pub fn require(&self, key: &'static str) -> Result<&str, SettingsError> {
        match self.get(key) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(SettingsError::Missing(key)),
        }
    }

    /// The S3 bucket for presigned links.
    pub fn bucket(&self) -> Result<&str, SettingsError> {
        self.require(BUCKET_KEY)
    }

    /// The SQS queue messages are sent to.
    pub fn queue_url(&self) -> Result<&str, SettingsError> {
        self.require(QUEUE_URL_KEY)
    }

    /// The environment override value, if any layer sets it.
    pub fn environment_override(&self) -> Option<&str> {
        self.get(ENVIRONMENT_OVERRIDE_KEY)
    }

    /// The AWS region: `AWS.Region`, then `AWS_REGION`, then [`DEFAULT_REGION`].
    pub fn region(&self) -> &str {
        [REGION_KEY, REGION_ENV_KEY]
            .into_iter()
            .filter_map(|key| self.get(key))
            .find(|value| !value.is_empty())
            .unwrap_or(DEFAULT_REGION)
    }

    /// Number of resolved keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no layer contributed any key.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all resolved entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Merge the four settings layers into a single view.
///
/// `base`, `environment` and `private` are JSON documents; any of them may be
/// absent. `process_env` is the set of environment variables, which always
/// takes precedence over the file layers.
///
/// Returns [`SettingsError::Malformed`] naming the first layer that fails to
/// parse. No partial view is ever returned.
pub fn resolve<I, K, V>(
    base: Option<&str>,
    environment: Option<&str>,
    private: Option<&str>,
    process_env: I,
) -> Result<Settings, SettingsError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut entries = BTreeMap::new();

    for (layer, content) in [
        ("base", base),
        ("environment", environment),
        ("private", private),
    ] {
        if let Some(content) = content.filter(|c| !c.trim().is_empty()) {
            entries.extend(json_layer(layer, content)?);
        }
    }

    entries.extend(env_layer(process_env));

    Ok(Settings { entries })
}

fn json_layer(layer: &'static str, content: &str) -> Result<BTreeMap<String, String>, SettingsError> {
    flatten_source(
        layer,
        config::File::from_str(content, config::FileFormat::Json),
    )
}

/// Environment variables map straight to keys: `__` separates nesting
/// levels and names are case-insensitive. Each variable is its own key, so a
/// leaf (`AWS`) and a nested key (`AWS__REGION`) coexist.
fn env_layer<I, K, V>(process_env: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    process_env
        .into_iter()
        .map(|(name, value)| {
            let key = name.into().replace(ENV_NESTING_SEPARATOR, ".");
            (normalize_key(&key), value.into())
        })
        .collect()
}

/// Parse one layer on its own and flatten it to dotted lowercase keys.
fn flatten_source<S>(layer: &'static str, source: S) -> Result<BTreeMap<String, String>, SettingsError>
where
    S: config::Source + Send + Sync + 'static,
{
    let tree: Value = config::Config::builder()
        .add_source(source)
        .build()
        .and_then(|c| c.try_deserialize())
        .map_err(|source| SettingsError::Malformed { layer, source })?;

    let mut entries = BTreeMap::new();
    flatten_into(&mut entries, "", &tree);
    Ok(entries)
}

fn flatten_into(entries: &mut BTreeMap<String, String>, prefix: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(entries, &join_key(prefix, key), child);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(entries, &join_key(prefix, &index.to_string()), child);
            }
        }
        Value::Null => {}
        Value::String(s) => {
            entries.insert(normalize_key(prefix), s.clone());
        }
        other => {
            entries.insert(normalize_key(prefix), other.to_string());
        }
    }
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn normalize_key(key: &str) -> String {
    key.to_lowercase()
}

// =============================================================================
// Tests
// =============================================================================
