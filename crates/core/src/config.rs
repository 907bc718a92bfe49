use std::path::{Path, PathBuf};

pub const DEFAULT_NAMESPACE: &str = "sisu";

const TYPED_EXPORTS_ENV: &str = "QBIND_TYPED_EXPORTS";
const NAMESPACE_ENV: &str = "QBIND_INDEX_NAMESPACE";

/// Settings for the qualified-type binder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinderConfig {
    /// Honour declared export types. When off, every type binds through its wildcard key.
    pub typed_exports: bool,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            typed_exports: true,
        }
    }
}

impl BinderConfig {
    /// Reads overrides from the environment. Evaluate once at startup and pass it along.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(TYPED_EXPORTS_ENV) {
            config.typed_exports = parse_flag(&value).unwrap_or(config.typed_exports);
        }
        config
    }
}

/// Settings for the persisted qualified-type index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    pub namespace: String,
    pub target_dir: PathBuf,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            target_dir: PathBuf::from("."),
        }
    }
}

impl IndexConfig {
    pub fn new(target_dir: impl AsRef<Path>) -> Self {
        Self {
            target_dir: target_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn from_env(target_dir: impl AsRef<Path>) -> Self {
        let mut config = Self::new(target_dir);
        if let Ok(namespace) = std::env::var(NAMESPACE_ENV) {
            let namespace = namespace.trim();
            if !namespace.is_empty() {
                config.namespace = namespace.to_string();
            }
        }
        config
    }

    /// Relative location of a category's index: `META-INF/<namespace>/<category>`.
    pub fn index_path(&self, category: &str) -> String {
        index_path(&self.namespace, category)
    }
}

pub fn index_path(namespace: &str, category: &str) -> String {
    format!("META-INF/{namespace}/{category}")
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
