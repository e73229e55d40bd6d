//! Fetcher configuration.
//!
//! Everything has a default, so the YAML file is optional. Values in the file
//! may reference environment variables as `${VAR}` or `${VAR:-default}`.
//! Command-line flags override whatever the file sets.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use retrieval::FetchOptions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Mount point of the NWM archive bucket
    #[serde(default = "default_archive_root")]
    pub archive_root: PathBuf,

    /// Comid ↔ feature position table
    #[serde(default = "default_index_table")]
    pub index_table: PathBuf,

    /// NetCDF variable holding channel streamflow
    #[serde(default = "default_variable")]
    pub variable: String,

    #[serde(flatten)]
    pub fetch: FetchOptions,
}

fn default_archive_root() -> PathBuf {
    PathBuf::from("/mnt/nwm")
}

fn default_index_table() -> PathBuf {
    PathBuf::from("netcdf_index.csv")
}

fn default_variable() -> String {
    netcdf_parser::STREAMFLOW_VARIABLE.to_string()
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            archive_root: default_archive_root(),
            index_table: default_index_table(),
            variable: default_variable(),
            fetch: FetchOptions::default(),
        }
    }
}

impl FetcherConfig {
    /// Load a YAML config file with environment variable substitution.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read fetcher config from {:?}", path.as_ref()))?;

        Self::from_yaml(&content)
            .with_context(|| format!("Failed to load fetcher config from {:?}", path.as_ref()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let expanded = expand_env_vars(content)?;
        let config: FetcherConfig =
            serde_yaml::from_str(&expanded).context("Failed to parse fetcher config YAML")?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            !self.variable.trim().is_empty(),
            "Streamflow variable name cannot be empty"
        );
        anyhow::ensure!(
            !self.archive_root.as_os_str().is_empty(),
            "Archive root cannot be empty"
        );
        self.fetch.validate()?;
        Ok(())
    }
}

/// Expand `${VAR}` and `${VAR:-default}` references.
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();

            let mut var_expr = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(c) => var_expr.push(c),
                    None => anyhow::bail!("Unclosed variable substitution: ${{{}", var_expr),
                }
            }

            result.push_str(&resolve_var_expr(&var_expr)?);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((var_name, default)) = expr.split_once(":-") {
        match std::env::var(var_name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim())
            .with_context(|| format!("Environment variable {} not set", expr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = FetcherConfig::from_yaml("{}").unwrap();
        assert_eq!(config, FetcherConfig::default());
        assert_eq!(config.variable, "streamflow");
        assert_eq!(config.fetch.workers.retrospective, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_document() {
        let yaml = r#"
archive_root: /data/nwm
index_table: /etc/nwm/netcdf_index.csv
variable: streamflow
window_days: 2
resolve_comids: true
workers:
  retrospective: 8
  short_range: 3
"#;
        let config = FetcherConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.archive_root, PathBuf::from("/data/nwm"));
        assert_eq!(config.index_table, PathBuf::from("/etc/nwm/netcdf_index.csv"));
        assert_eq!(config.fetch.window_days, 2);
        assert!(config.fetch.resolve_comids);
        assert_eq!(config.fetch.workers.retrospective, 8);
        assert_eq!(config.fetch.workers.short_range, 3);
        assert_eq!(config.fetch.workers.medium_range, 18);
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("FETCHER_TEST_ARCHIVE_ROOT", "/mnt/bucket");
        std::env::remove_var("FETCHER_TEST_UNSET_TABLE");

        let yaml = "archive_root: ${FETCHER_TEST_ARCHIVE_ROOT}\nindex_table: ${FETCHER_TEST_UNSET_TABLE:-/tmp/index.csv}\n";
        let config = FetcherConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.archive_root, PathBuf::from("/mnt/bucket"));
        assert_eq!(config.index_table, PathBuf::from("/tmp/index.csv"));
    }

    #[test]
    fn test_missing_required_env_var() {
        std::env::remove_var("FETCHER_TEST_REQUIRED");
        assert!(FetcherConfig::from_yaml("archive_root: ${FETCHER_TEST_REQUIRED}").is_err());
        assert!(expand_env_vars("${UNCLOSED").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = FetcherConfig::default();
        config.fetch.workers.short_range = 0;
        assert!(config.validate().is_err());

        let config = FetcherConfig {
            variable: "  ".to_string(),
            ..FetcherConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "window_days: 3").unwrap();

        let config = FetcherConfig::load(file.path()).unwrap();
        assert_eq!(config.fetch.window_days, 3);
        assert!(FetcherConfig::load("/nonexistent/fetcher.yaml").is_err());
    }
}
