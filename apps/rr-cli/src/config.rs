//! Settings file structures.
//!
//! Queue endpoint and wait tuning can live in a `.runrelay.toml` next to
//! the pipeline project, so the completion hook only has to export the
//! per-run values. CLI flags and `RUNRELAY_*` environment variables both
//! override the file.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Top-level settings from .runrelay.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Queue endpoint configuration.
    #[serde(default)]
    pub queue: QueueSettings,

    /// Manifest wait tuning.
    #[serde(default)]
    pub watch: WatchSettings,

    /// Manifest interpretation settings.
    #[serde(default)]
    pub manifest: ManifestSettings,
}

/// Queue endpoint configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueSettings {
    /// Queue endpoint URL.
    pub url: Option<String>,

    /// Queue region.
    pub region: Option<String>,
}

/// Manifest wait tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchSettings {
    /// Upper bound on the manifest wait, in seconds.
    #[serde(default = "default_max_wait_secs")]
    pub max_wait_secs: u64,

    /// Pause between manifest checks, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            max_wait_secs: default_max_wait_secs(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Manifest interpretation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestSettings {
    /// Filename of the workflow-file entity to look for in the manifest.
    #[serde(default = "default_main_script")]
    pub main_script: String,
}

impl Default for ManifestSettings {
    fn default() -> Self {
        Self {
            main_script: default_main_script(),
        }
    }
}

// Serde default functions
fn default_max_wait_secs() -> u64 {
    60
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_main_script() -> String {
    "main.nf".to_string()
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse settings file {}", path.display()))
    }

    /// Load settings, falling back to defaults when the file is absent.
    ///
    /// An explicitly requested file that cannot be read is an error; the
    /// implicit default location is allowed to be missing.
    pub fn load_or_default(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(".runrelay.toml");
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_parses_to_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.queue.url, None);
        assert_eq!(settings.watch.max_wait_secs, 60);
        assert_eq!(settings.watch.poll_interval_ms, 500);
        assert_eq!(settings.manifest.main_script, "main.nf");
    }

    #[test]
    fn partial_sections_keep_per_field_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [queue]
            url = "https://sqs.us-east-1.amazonaws.com/123456789012/packager"

            [watch]
            max_wait_secs = 120
            "#,
        )
        .unwrap();
        assert_eq!(
            settings.queue.url.as_deref(),
            Some("https://sqs.us-east-1.amazonaws.com/123456789012/packager")
        );
        assert_eq!(settings.queue.region, None);
        assert_eq!(settings.watch.max_wait_secs, 120);
        assert_eq!(settings.watch.poll_interval_ms, 500);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Settings::load_or_default(Some(&missing)).is_err());
    }
}
