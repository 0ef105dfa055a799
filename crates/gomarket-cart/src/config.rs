//! # Cart Configuration
//!
//! Settings read once when the cart API is constructed.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`GOMARKET_*`), via [`CartConfig::from_env`]
//! 2. Builder setters
//! 3. Defaults (this file)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use gomarket_core::PRODUCTS_STORAGE_KEY;

/// Database file name inside the platform data directory.
const DATABASE_FILE_NAME: &str = "gomarket.db";

/// What hydration does when the stored snapshot cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CorruptSnapshotPolicy {
    /// Log a warning and start from an empty cart.
    #[default]
    FallbackToEmpty,

    /// Fail `init()` with `CartError::HydrationParse`.
    Reject,
}

/// Cart configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Key the snapshot is stored under.
    /// Default: `@GoMarketplace:products`
    pub storage_key: String,

    /// SQLite file used by `CartApi::open`.
    /// Default: `<platform data dir>/gomarket.db`
    pub database_path: PathBuf,

    /// Hydration behavior for unreadable snapshots.
    pub corrupt_snapshot: CorruptSnapshotPolicy,
}

impl Default for CartConfig {
    fn default() -> Self {
        CartConfig {
            storage_key: PRODUCTS_STORAGE_KEY.to_string(),
            database_path: default_database_path(),
            corrupt_snapshot: CorruptSnapshotPolicy::default(),
        }
    }
}

impl CartConfig {
    /// Creates a new CartConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `GOMARKET_STORAGE_KEY`: Override the snapshot key
    /// - `GOMARKET_DB_PATH`: Override the database file path
    /// - `GOMARKET_STRICT_HYDRATION`: `1`/`true` rejects unreadable snapshots
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = CartConfig::default();

        if let Some(key) = lookup("GOMARKET_STORAGE_KEY").filter(|k| !k.trim().is_empty()) {
            config.storage_key = key;
        }

        if let Some(path) = lookup("GOMARKET_DB_PATH") {
            config.database_path = PathBuf::from(path);
        }

        if let Some(strict) = lookup("GOMARKET_STRICT_HYDRATION") {
            if matches!(strict.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes") {
                config.corrupt_snapshot = CorruptSnapshotPolicy::Reject;
            }
        }

        config
    }

    /// Sets the snapshot key.
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Sets the database file path.
    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    /// Sets the corrupt snapshot policy.
    pub fn corrupt_snapshot(mut self, policy: CorruptSnapshotPolicy) -> Self {
        self.corrupt_snapshot = policy;
        self
    }

    /// Creates the directory holding the database file if needed.
    pub fn ensure_database_dir(&self) -> std::io::Result<()> {
        match self.database_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir),
            _ => Ok(()),
        }
    }
}

/// Determines the database file path based on the platform.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.gomarket.cart/gomarket.db`
/// - **Windows**: `%APPDATA%\gomarket\cart\data\gomarket.db`
/// - **Linux**: `~/.local/share/cart/gomarket.db`
///
/// Falls back to the working directory when no home directory is known.
pub fn default_database_path() -> PathBuf {
    ProjectDirs::from("com", "gomarket", "cart")
        .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
        .unwrap_or_else(|| Path::new(DATABASE_FILE_NAME).to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CartConfig::default();
        assert_eq!(config.storage_key, "@GoMarketplace:products");
        assert_eq!(config.corrupt_snapshot, CorruptSnapshotPolicy::FallbackToEmpty);
        assert!(config.database_path.ends_with("gomarket.db"));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = CartConfig::from_lookup(lookup_from(&[
            ("GOMARKET_STORAGE_KEY", "@Test:products"),
            ("GOMARKET_DB_PATH", "/tmp/gomarket-test.db"),
            ("GOMARKET_STRICT_HYDRATION", "TRUE"),
        ]));

        assert_eq!(config.storage_key, "@Test:products");
        assert_eq!(config.database_path, PathBuf::from("/tmp/gomarket-test.db"));
        assert_eq!(config.corrupt_snapshot, CorruptSnapshotPolicy::Reject);
    }

    #[test]
    fn test_from_lookup_ignores_blank_key_and_unknown_flag() {
        let config = CartConfig::from_lookup(lookup_from(&[
            ("GOMARKET_STORAGE_KEY", "  "),
            ("GOMARKET_STRICT_HYDRATION", "maybe"),
        ]));

        assert_eq!(config.storage_key, PRODUCTS_STORAGE_KEY);
        assert_eq!(config.corrupt_snapshot, CorruptSnapshotPolicy::FallbackToEmpty);
    }

    #[test]
    fn test_builder() {
        let config = CartConfig::default()
            .storage_key("k")
            .database_path("data/cart.db")
            .corrupt_snapshot(CorruptSnapshotPolicy::Reject);

        assert_eq!(config.storage_key, "k");
        assert_eq!(config.database_path, PathBuf::from("data/cart.db"));
        assert_eq!(config.corrupt_snapshot, CorruptSnapshotPolicy::Reject);
    }
}
