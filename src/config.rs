//! Configuration management for the snippet checker.
//!
//! Handles:
//! - Command-line argument parsing
//! - Optional TOML config file
//! - Enrichment credentials from the environment

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::enrichment::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};

const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Command-line arguments for the snippet checker
#[derive(Debug, Parser)]
#[command(name = "snippet-checker")]
#[command(about = "Heuristic diagnostics and corrections for short code snippets")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to a TOML config file
    #[arg(long, global = true, help = "Config file (default: <config dir>/snippet-checker/config.toml)")]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(
        long,
        global = true,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serve the validation API over HTTP
    Serve {
        #[arg(long, help = "Address to listen on (e.g. 127.0.0.1:3000)")]
        bind: Option<SocketAddr>,
    },
    /// Run as a language server over stdio
    Lsp,
}

/// Which transport the binary runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Http,
    Lsp,
}

/// Config file structure (matches TOML)
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConfigFile {
    pub bind: Option<SocketAddr>,
    pub enrichment: EnrichmentFile,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnrichmentFile {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub min_code_chars: usize,
    pub api_key_env: String,
}

impl Default for EnrichmentFile {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 15,
            min_code_chars: 10,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

/// Resolved enrichment settings; present only when a backend can be used
#[derive(Clone)]
pub struct EnrichmentConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
    pub min_code_chars: usize,
}

impl std::fmt::Debug for EnrichmentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichmentConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("min_code_chars", &self.min_code_chars)
            .finish_non_exhaustive()
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub bind: SocketAddr,
    pub enrichment: Option<EnrichmentConfig>,
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments and environment
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => load_config_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => load_config_file(&path)?,
                None => ConfigFile::default(),
            },
        };

        let api_key = std::env::var(&file.enrichment.api_key_env).ok();
        Self::resolve(args, file, api_key)
    }

    /// Merge defaults, config file and CLI; `api_key` is the value of the configured key variable.
    pub fn resolve(args: Args, file: ConfigFile, api_key: Option<String>) -> Result<Self> {
        let (mode, cli_bind) = match args.command {
            None => (Mode::Http, None),
            Some(Command::Serve { bind }) => (Mode::Http, bind),
            Some(Command::Lsp) => (Mode::Lsp, None),
        };

        let bind = match cli_bind.or(file.bind) {
            Some(bind) => bind,
            None => DEFAULT_BIND.parse().context("invalid default bind address")?,
        };

        let settings = file.enrichment;
        let enrichment = api_key
            .filter(|key| settings.enabled && !key.trim().is_empty())
            .map(|api_key| EnrichmentConfig {
                base_url: settings.base_url,
                model: settings.model,
                api_key,
                timeout: Duration::from_secs(settings.timeout_secs),
                min_code_chars: settings.min_code_chars,
            });

        Ok(Config {
            mode,
            bind,
            enrichment,
            log_level: args.log_level,
        })
    }
}

/// Default location of the user config file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("snippet-checker").join("config.toml"))
}

/// Read and parse a TOML config file
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}
