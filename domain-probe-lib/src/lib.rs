//! # Domain Probe Library
//!
//! A fast, robust library for probing domain availability with a two-tier
//! check: a cheap DNS precheck (MX then NS records) settles registered
//! domains immediately, and an authoritative WHOIS query handles only the
//! candidates DNS could not confirm.
//!
//! Seeds can be raw domains, email addresses or bare keywords; keywords are
//! crossed with a TLD list into fully-qualified candidates, deduplicated for
//! the whole run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_probe_lib::DomainProber;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let prober = DomainProber::new();
//!     let report = prober.run(&["alice@example.com".to_string()]).await?;
//!
//!     for domain in report.available() {
//!         println!("{} is available", domain);
//!     }
//!     println!("{:?}", report.summary);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **DNS precheck**: MX/NS probes short-circuit registered domains without
//!   any WHOIS traffic
//! - **WHOIS fallback**: raw port-43 queries with per-TLD server selection
//!   and IANA referral discovery
//! - **Shared rate limiting**: a global minimum-interval gate protects
//!   registries regardless of worker count
//! - **Concurrent processing**: bounded worker pool with clean cancellation
//! - **Configurable**: config file, environment and builder APIs

// Re-export main public API types and functions
pub use checker::{DomainProber, ProgressCallback};
pub use config::{
    apply_env_config, apply_file_config, load_env_config, parse_duration_string, ConfigManager,
    DefaultsConfig, EnvConfig, FileConfig, OutputConfig,
};
pub use dns::{DnsPrecheck, DnsPrechecker, DnsVerdict};
pub use error::ProbeError;
pub use expand::{
    classify_seed, default_tlds, expand_seeds, Expansion, SeedKind, SkippedSeed, DEFAULT_TLDS,
};
pub use ratelimit::WhoisRateLimiter;
pub use types::{
    CandidateResult, CheckMethod, DomainStatus, ProbeConfig, RunReport, RunSummary,
    WhoisErrorPolicy,
};
pub use whois::{WhoisLookup, WhoisResolver, WhoisStatus};

// Internal modules - the public surface is the re-exports above
mod checker;
mod config;
mod dns;
mod error;
mod expand;
mod ratelimit;
mod types;
mod whois;

/// Type alias for convenience
pub type Result<T> = std::result::Result<T, ProbeError>;

/// Library version, for CLI display and debugging
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
