//! Dispatcher configuration.

use tracing::warn;

/// Thread name given to background fill workers.
pub const DEFAULT_WORKER_NAME: &str = "imagestag-fill";

/// Set to `1`, `true` or `yes` to keep every fill on the calling thread.
pub const INLINE_ENV: &str = "IMAGESTAG_FILL_INLINE";

/// Stack size for the worker thread, in bytes.
pub const STACK_SIZE_ENV: &str = "IMAGESTAG_FILL_STACK_SIZE";

/// Settings for a [`FillDispatcher`](super::FillDispatcher).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Try to run fills on a background worker.
    pub background: bool,
    pub worker_name: String,
    /// Worker stack size; `None` uses the platform default.
    pub stack_size: Option<usize>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            background: true,
            worker_name: DEFAULT_WORKER_NAME.to_string(),
            stack_size: None,
        }
    }
}

impl DispatchConfig {
    /// Configuration that never leaves the calling thread.
    pub fn inline() -> Self {
        Self {
            background: false,
            ..Self::default()
        }
    }

    /// Defaults overridden by `IMAGESTAG_FILL_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().apply_env(|key| std::env::var(key).ok())
    }

    pub fn with_background(mut self, background: bool) -> Self {
        self.background = background;
        self
    }

    pub fn with_worker_name(mut self, name: impl Into<String>) -> Self {
        self.worker_name = name.into();
        self
    }

    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(value) = lookup(INLINE_ENV) {
            if matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes") {
                self.background = false;
            }
        }

        if let Some(value) = lookup(STACK_SIZE_ENV) {
            match value.trim().parse::<usize>() {
                Ok(bytes) if bytes > 0 => self.stack_size = Some(bytes),
                _ => warn!(%value, "ignoring invalid {}", STACK_SIZE_ENV),
            }
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DispatchConfig::default();
        assert!(config.background);
        assert_eq!(config.worker_name, "imagestag-fill");
        assert_eq!(config.stack_size, None);
        assert!(!DispatchConfig::inline().background);
    }

    #[test]
    fn test_env_forces_inline() {
        let config = DispatchConfig::default().apply_env(env(&[(INLINE_ENV, "TRUE")]));
        assert!(!config.background);

        let config = DispatchConfig::default().apply_env(env(&[(INLINE_ENV, "0")]));
        assert!(config.background);
    }

    #[test]
    fn test_env_stack_size() {
        let config = DispatchConfig::default().apply_env(env(&[(STACK_SIZE_ENV, "8388608")]));
        assert_eq!(config.stack_size, Some(8 * 1024 * 1024));

        let config = DispatchConfig::default()
            .with_stack_size(1024)
            .apply_env(env(&[(STACK_SIZE_ENV, "lots")]));
        assert_eq!(config.stack_size, Some(1024));
    }

    #[test]
    fn test_builder() {
        let config = DispatchConfig::default()
            .with_background(false)
            .with_worker_name("bucket");
        assert!(!config.background);
        assert_eq!(config.worker_name, "bucket");
    }
}
