//! File-based configuration provider
//!
//! Per-domain YAML documents live in a configuration directory (default
//! `/etc/cfddns`). A domain is looked up first by its exact name, then by
//! its registrable root, so `home.example.com` falls back to
//! `example.com.yaml` when no host-specific file exists.
//!
//! Document format:
//!
//! ```yaml
//! token: "cloudflare-api-token"
//! frequency: 300
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use cfddns_core::domain::registrable_root;
use cfddns_core::traits::ConfigProvider;
use cfddns_core::{Error, ReconcileConfig, Result};

/// On-disk configuration document
#[derive(Debug, Deserialize)]
struct ConfigDocument {
    /// Provider API token
    token: String,
    /// Seconds between poll cycles
    frequency: u64,
}

/// Configuration provider backed by per-domain YAML files
pub struct FileConfigProvider {
    dir: PathBuf,
}

impl FileConfigProvider {
    /// Create a provider searching the given directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Candidate config paths for a domain, most specific first
    fn candidates(&self, domain: &str) -> Vec<PathBuf> {
        let mut paths = vec![self.dir.join(format!("{}.yaml", domain))];
        if let Ok(root) = registrable_root(domain)
            && root != domain
        {
            paths.push(self.dir.join(format!("{}.yaml", root)));
        }
        paths
    }

    fn read_document(path: &Path) -> Result<ConfigDocument> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?;
        serde_yaml::from_str(&text)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
    }
}

impl ConfigProvider for FileConfigProvider {
    fn load(&self, domain: &str) -> Result<ReconcileConfig> {
        let candidates = self.candidates(domain);
        let path = candidates
            .iter()
            .find(|p| p.is_file())
            .ok_or_else(|| {
                let searched: Vec<String> = candidates
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect();
                Error::config(format!(
                    "no configuration file found for {} (searched: {})",
                    domain,
                    searched.join(", ")
                ))
            })?;

        tracing::debug!(path = %path.display(), "loading configuration");
        let doc = Self::read_document(path)?;

        let config = ReconcileConfig::new(domain, doc.token, doc.frequency);
        config.validate()?;
        Ok(config)
    }
}
