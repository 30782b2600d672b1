//! Configuration file loading for meterfix.
//!
//! A `meterfix.toml` is only read when passed explicitly with `--config`; a bare `meterfix`
//! invocation reads nothing. CLI arguments take precedence over file settings.

use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// Top-level configuration from meterfix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MeterfixConfig {
    /// Output settings (target table, summary).
    pub output: OutputConfig,

    /// Rule selection (allow/deny lists over rule ids).
    pub policy: PolicyConfig,
}

/// Output section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Table the statements target.
    pub table: Option<String>,

    /// Print the zone summary after the script.
    pub include_summary: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            table: None,
            include_summary: true,
        }
    }
}

/// Policy section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Allowlist patterns for rule ids. If non-empty, only matching rules are planned.
    pub allow: Vec<String>,

    /// Denylist patterns for rule ids.
    pub deny: Vec<String>,
}

/// Load and parse a meterfix.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<MeterfixConfig> {
    debug!("loading config file {}", path);
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<MeterfixConfig> {
    let config: MeterfixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load the file at `path` if given, otherwise use defaults.
pub fn load_or_default(path: Option<&Utf8Path>) -> anyhow::Result<MeterfixConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(MeterfixConfig::default()),
    }
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub table: String,

    /// Allow patterns (from config file, extended by CLI).
    pub allow: Vec<String>,

    /// Deny patterns (from config file, extended by CLI).
    pub deny: Vec<String>,

    pub include_summary: bool,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: MeterfixConfig,
}

impl ConfigMerger {
    pub fn new(config: MeterfixConfig) -> Self {
        Self { config }
    }

    /// Merge with generate command CLI arguments.
    ///
    /// CLI `allow` and `deny` lists extend the config file lists. A CLI table overrides the
    /// config table; `--no-summary` wins over `include_summary = true`.
    pub fn merge_generate_args(
        self,
        cli_table: Option<&str>,
        cli_allow: &[String],
        cli_deny: &[String],
        no_summary: bool,
    ) -> MergedConfig {
        let mut allow = self.config.policy.allow;
        let mut deny = self.config.policy.deny;

        for pattern in cli_allow {
            if !allow.contains(pattern) {
                allow.push(pattern.clone());
            }
        }
        for pattern in cli_deny {
            if !deny.contains(pattern) {
                deny.push(pattern.clone());
            }
        }

        let table = cli_table
            .map(str::to_string)
            .or(self.config.output.table)
            .unwrap_or_else(|| meterfix_types::DEFAULT_TABLE.to_string());

        MergedConfig {
            table,
            allow,
            deny,
            include_summary: self.config.output.include_summary && !no_summary,
        }
    }
}
