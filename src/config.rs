// ⚙️ Configuration - Defaults, optional JSON file, env overrides
//
// Resolution order (later wins):
// 1. Built-in defaults
// 2. JSON file named by CATEGORIZER_CONFIG
// 3. CATEGORIZER_* environment variables

use crate::taxonomy::TaxonomySource;
use crate::tokenizer::CaseMode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG: &str = "CATEGORIZER_CONFIG";
pub const ENV_TAXONOMY: &str = "CATEGORIZER_TAXONOMY";
pub const ENV_BIND: &str = "CATEGORIZER_BIND";
pub const ENV_CASE_INSENSITIVE: &str = "CATEGORIZER_CASE_INSENSITIVE";
pub const ENV_ROUTE_PREFIX: &str = "CATEGORIZER_ROUTE_PREFIX";
pub const ENV_LOG: &str = "CATEGORIZER_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Taxonomy file (.json/.csv/.db); builtin model when unset
    pub taxonomy_path: Option<PathBuf>,

    /// Address the HTTP server listens on
    pub bind_addr: String,

    /// Prefix the API routes are nested under
    pub route_prefix: String,

    pub case_mode: CaseMode,

    /// Default tracing filter; RUST_LOG takes precedence when set
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            taxonomy_path: None,
            bind_addr: "0.0.0.0:8080".to_string(),
            route_prefix: "/nlp/finance/vanguard".to_string(),
            case_mode: CaseMode::Sensitive,
            log_filter: "term_categorizer=info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        let vars: HashMap<String, String> = env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Same as `load`, but over an explicit variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let mut config = match vars.get(ENV_CONFIG) {
            Some(path) => Self::from_file(path)?,
            None => AppConfig::default(),
        };
        config.apply_overrides(vars)?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    fn apply_overrides(&mut self, vars: &HashMap<String, String>) -> Result<()> {
        if let Some(path) = non_empty(vars, ENV_TAXONOMY) {
            self.taxonomy_path = Some(PathBuf::from(path));
        }
        if let Some(addr) = non_empty(vars, ENV_BIND) {
            self.bind_addr = addr.to_string();
        }
        if let Some(prefix) = non_empty(vars, ENV_ROUTE_PREFIX) {
            self.route_prefix = prefix.to_string();
        }
        if let Some(filter) = non_empty(vars, ENV_LOG) {
            self.log_filter = filter.to_string();
        }
        if let Some(flag) = non_empty(vars, ENV_CASE_INSENSITIVE) {
            self.case_mode = if parse_bool(flag)
                .with_context(|| format!("Invalid value for {}: {:?}", ENV_CASE_INSENSITIVE, flag))?
            {
                CaseMode::Insensitive
            } else {
                CaseMode::Sensitive
            };
        }
        Ok(())
    }

    /// Where the taxonomy should be loaded from.
    pub fn taxonomy_source(&self) -> Result<TaxonomySource> {
        match &self.taxonomy_path {
            Some(path) => TaxonomySource::from_path(path),
            None => Ok(TaxonomySource::Builtin),
        }
    }
}

fn non_empty<'a>(vars: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got {:?}", other),
    }
}

/// Install the global tracing subscriber on stderr; RUST_LOG overrides
/// `default_filter`.
pub fn init_tracing(default_filter: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A second init (e.g. in tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

// ============================================================================
// TESTS
// ============================================================================
