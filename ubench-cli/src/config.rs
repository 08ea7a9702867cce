//! Configuration loading from ubench.toml
//!
//! Defaults for filters, comparison thresholds and output can be kept in a
//! `ubench.toml` file. The configuration is automatically discovered by walking
//! up from the current directory. Command-line flags override every value.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use ubench_report::{DEFAULT_PRECISION, OutputFormat};
use ubench_stats::{DEFAULT_P_THRESHOLD, SignificanceBackend};

/// Name of the configuration file looked up during discovery
pub const CONFIG_FILE_NAME: &str = "ubench.toml";

/// ubench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UbenchConfig {
    /// Comparison configuration
    #[serde(default)]
    pub compare: CompareConfig,
    /// Default benchmark filters
    #[serde(default)]
    pub filter: FilterConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Significance backend selection
    #[serde(default)]
    pub significance: SignificanceConfig,
}

/// Comparison configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompareConfig {
    /// Wilcoxon p-value threshold for significance
    #[serde(default = "default_p_threshold")]
    pub wilcoxon_p_threshold: f64,
    /// Paired t-test p-value threshold for significance
    #[serde(default = "default_p_threshold")]
    pub ttest_p_threshold: f64,
    /// Only show significant changes
    #[serde(default)]
    pub significant_changes: bool,
    /// Sort rows by relative difference
    #[serde(default)]
    pub order_by_diff: bool,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            wilcoxon_p_threshold: default_p_threshold(),
            ttest_p_threshold: default_p_threshold(),
            significant_changes: false,
            order_by_diff: false,
        }
    }
}

fn default_p_threshold() -> f64 {
    DEFAULT_P_THRESHOLD
}

/// Default include/exclude glob patterns
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FilterConfig {
    /// Keep only benchmarks matching one of these patterns
    #[serde(default)]
    pub include: Vec<String>,
    /// Drop benchmarks matching one of these patterns
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Default output format: "human", "json" or "csv"
    #[serde(default)]
    pub format: OutputFormat,
    /// Number of extra columns (0 to 2)
    #[serde(default)]
    pub verbosity: u8,
    /// Decimal places in human output
    #[serde(default = "default_precision")]
    pub precision: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            verbosity: 0,
            precision: default_precision(),
        }
    }
}

fn default_precision() -> usize {
    DEFAULT_PRECISION
}

/// Significance backend configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SignificanceConfig {
    /// "builtin" or "none"
    #[serde(default)]
    pub backend: SignificanceBackend,
}

impl UbenchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let dir = std::env::current_dir().ok()?;
        Self::discover_from(dir)
    }

    /// Walk up from `start` and load the first `ubench.toml` found.
    ///
    /// A file that fails to parse is reported and ignored.
    pub fn discover_from(start: impl Into<PathBuf>) -> Option<Self> {
        let mut dir = start.into();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => {
                        tracing::debug!(path = %config_path.display(), "Loaded configuration");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %config_path.display(),
                            error = %e,
                            "Ignoring invalid configuration"
                        );
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# ubench Configuration

[compare]
# p-value thresholds; a change is significant only if both tests pass
wilcoxon_p_threshold = 0.05
ttest_p_threshold = 0.05
# Only show significant changes
significant_changes = false
# Sort rows by relative difference
order_by_diff = false

[filter]
# Glob patterns matched against path segments, e.g. "suite/*"
include = []
exclude = []

[output]
# Output format: human, json, csv
format = "human"
# Extra columns: 0, 1 or 2
verbosity = 0
# Decimal places in human output
precision = 3

[significance]
# Significance backend: builtin or none
backend = "builtin"
"#
        .to_string()
    }
}
