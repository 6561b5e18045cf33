//! Configuration file and environment variable support.
//!
//! Layering, lowest precedence first: built-in defaults, config file,
//! `DP_*` environment variables, CLI flags (applied by the binary).
//!
//! Config files are TOML:
//!
//! ```toml
//! [defaults]
//! concurrency = 8
//! dns_timeout = "5s"
//! whois_timeout = "30s"
//! whois_delay = "1s"
//! on_whois_error = "conservative"
//! tlds = ["com", "net", "org"]
//!
//! [output]
//! directory = "./results"
//! json = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ProbeError;
use crate::types::{ProbeConfig, WhoisErrorPolicy};

/// Parsed contents of a config file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    pub defaults: Option<DefaultsConfig>,
    pub output: Option<OutputConfig>,
}

/// The `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    pub concurrency: Option<usize>,
    /// Duration strings: "5s", "500ms", "2m", or bare seconds
    pub dns_timeout: Option<String>,
    pub whois_timeout: Option<String>,
    pub whois_delay: Option<String>,
    pub on_whois_error: Option<String>,
    pub tlds: Option<Vec<String>>,
}

/// The `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    pub directory: Option<String>,
    pub json: Option<bool>,
}

/// Loads config files from explicit paths or discovery locations.
pub struct ConfigManager {
    verbose: bool,
}

impl ConfigManager {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load and parse a specific config file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, ProbeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ProbeError::file_error(path.display().to_string(), e.to_string()))?;

        toml::from_str(&content).map_err(|e| {
            ProbeError::config(format!("invalid config file {}: {}", path.display(), e))
        })
    }

    /// Discover a config file in the standard locations and load the first
    /// match: `./domain-probe.toml`, then `~/.config/domain-probe/config.toml`.
    pub fn discover_and_load(&self) -> Result<FileConfig, ProbeError> {
        let candidates = Self::discovery_paths();
        let existing: Vec<&PathBuf> = candidates.iter().filter(|p| p.exists()).collect();

        if existing.len() > 1 && self.verbose {
            eprintln!("⚠️  Multiple config files found. Using precedence:");
            for (i, path) in existing.iter().enumerate() {
                let status = if i == 0 { "active" } else { "ignored" };
                eprintln!("   {} ({})", path.display(), status);
            }
        }

        match existing.first() {
            Some(path) => self.load_file(path),
            None => Ok(FileConfig::default()),
        }
    }

    fn discovery_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("domain-probe.toml")];
        if let Ok(home) = std::env::var("HOME") {
            paths.push(
                PathBuf::from(home)
                    .join(".config")
                    .join("domain-probe")
                    .join("config.toml"),
            );
        }
        paths
    }
}

/// Settings read from `DP_*` environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub concurrency: Option<usize>,
    pub dns_timeout: Option<Duration>,
    pub whois_timeout: Option<Duration>,
    pub whois_delay: Option<Duration>,
    pub on_whois_error: Option<WhoisErrorPolicy>,
    pub tlds: Option<Vec<String>>,
}

/// Read environment overrides, warning (not failing) on invalid values.
pub fn load_env_config(verbose: bool) -> EnvConfig {
    let mut config = EnvConfig::default();

    if let Ok(val) = std::env::var("DP_CONCURRENCY") {
        match val.parse::<usize>() {
            Ok(n) if (1..=64).contains(&n) => config.concurrency = Some(n),
            _ => eprintln!("⚠️ Invalid DP_CONCURRENCY='{}', must be 1-64", val),
        }
    }

    for (var, slot) in [
        ("DP_DNS_TIMEOUT", &mut config.dns_timeout),
        ("DP_WHOIS_TIMEOUT", &mut config.whois_timeout),
        ("DP_WHOIS_DELAY", &mut config.whois_delay),
    ] {
        if let Ok(val) = std::env::var(var) {
            match parse_duration_string(&val) {
                Some(duration) => *slot = Some(duration),
                None => eprintln!("⚠️ Invalid {}='{}', use e.g. '5s', '500ms', '2m'", var, val),
            }
        }
    }

    if let Ok(val) = std::env::var("DP_ON_WHOIS_ERROR") {
        match val.parse::<WhoisErrorPolicy>() {
            Ok(policy) => config.on_whois_error = Some(policy),
            Err(_) => eprintln!(
                "⚠️ Invalid DP_ON_WHOIS_ERROR='{}', use conservative/optimistic",
                val
            ),
        }
    }

    if let Ok(val) = std::env::var("DP_TLDS") {
        let tlds: Vec<String> = val
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if tlds.is_empty() {
            eprintln!("⚠️ Invalid DP_TLDS='{}', expected comma-separated list", val);
        } else {
            config.tlds = Some(tlds);
        }
    }

    if verbose {
        eprintln!("Environment config: {:?}", config);
    }

    config
}

/// Parse a human duration: "30" (seconds), "30s", "500ms", "2m".
pub fn parse_duration_string(input: &str) -> Option<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(ms) = input.strip_suffix("ms") {
        return ms.trim().parse::<u64>().ok().map(Duration::from_millis);
    }
    if let Some(secs) = input.strip_suffix('s') {
        return secs.trim().parse::<u64>().ok().map(Duration::from_secs);
    }
    if let Some(mins) = input.strip_suffix('m') {
        return mins
            .trim()
            .parse::<u64>()
            .ok()
            .map(|m| Duration::from_secs(m * 60));
    }

    input.parse::<u64>().ok().map(Duration::from_secs)
}

/// Apply `[defaults]` from a config file onto a `ProbeConfig`.
///
/// Invalid entries warn and are skipped, mirroring the env layer.
pub fn apply_file_config(mut config: ProbeConfig, file: &FileConfig) -> ProbeConfig {
    let Some(defaults) = &file.defaults else {
        return config;
    };

    if let Some(concurrency) = defaults.concurrency {
        config = config.with_concurrency(concurrency);
    }
    for (name, value, slot) in [
        ("dns_timeout", &defaults.dns_timeout, &mut config.dns_timeout),
        (
            "whois_timeout",
            &defaults.whois_timeout,
            &mut config.whois_timeout,
        ),
        (
            "whois_delay",
            &defaults.whois_delay,
            &mut config.whois_delay,
        ),
    ] {
        if let Some(raw) = value {
            match parse_duration_string(raw) {
                Some(duration) => *slot = duration,
                None => eprintln!("⚠️ Invalid {} '{}' in config file", name, raw),
            }
        }
    }
    if let Some(raw) = &defaults.on_whois_error {
        match raw.parse::<WhoisErrorPolicy>() {
            Ok(policy) => config.on_whois_error = policy,
            Err(e) => eprintln!("⚠️ {} in config file", e),
        }
    }
    if let Some(tlds) = &defaults.tlds {
        config.tlds = Some(tlds.clone());
    }

    config
}

/// Apply environment overrides onto a `ProbeConfig`.
pub fn apply_env_config(mut config: ProbeConfig, env: &EnvConfig) -> ProbeConfig {
    if let Some(concurrency) = env.concurrency {
        config = config.with_concurrency(concurrency);
    }
    if let Some(timeout) = env.dns_timeout {
        config.dns_timeout = timeout;
    }
    if let Some(timeout) = env.whois_timeout {
        config.whois_timeout = timeout;
    }
    if let Some(delay) = env.whois_delay {
        config.whois_delay = delay;
    }
    if let Some(policy) = env.on_whois_error {
        config.on_whois_error = policy;
    }
    if let Some(tlds) = &env.tlds {
        config.tlds = Some(tlds.clone());
    }
    config
}
