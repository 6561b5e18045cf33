//! Probing orchestrator.
//!
//! Sequences the two probe tiers per candidate - DNS precheck first, WHOIS
//! only when DNS was inconclusive - and runs candidates across a bounded
//! worker pool. Per-candidate failures are isolated: a resolver exception
//! never aborts the run, it becomes an Unknown outcome in the report.

use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::dns::{DnsPrecheck, DnsPrechecker, DnsVerdict};
use crate::error::ProbeError;
use crate::expand::{default_tlds, expand_seeds};
use crate::ratelimit::WhoisRateLimiter;
use crate::types::{
    CandidateResult, CheckMethod, DomainStatus, ProbeConfig, RunReport, WhoisErrorPolicy,
};
use crate::whois::{WhoisLookup, WhoisResolver, WhoisStatus};

/// Invoked as candidates finish: (completed, total, domain).
pub type ProgressCallback = Box<dyn Fn(usize, usize, &str) + Send + Sync>;

/// Orchestrates availability probing across the DNS and WHOIS tiers.
///
/// Generic over the probe seams so tests can inject scripted doubles;
/// `new()`/`with_config()` wire up the real clients.
///
/// # Example
///
/// ```rust,no_run
/// use domain_probe_lib::DomainProber;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let prober = DomainProber::new();
///     let report = prober.run(&["example".to_string()]).await?;
///     for domain in report.available() {
///         println!("{}", domain);
///     }
///     Ok(())
/// }
/// ```
pub struct DomainProber<D = DnsPrechecker, W = WhoisResolver> {
    config: ProbeConfig,
    dns: D,
    whois: W,
}

impl DomainProber {
    /// Create a prober with default configuration and real clients.
    pub fn new() -> Self {
        Self::with_config(ProbeConfig::default())
    }

    /// Create a prober with custom configuration.
    ///
    /// The WHOIS rate limiter is built from `config.whois_delay` and shared
    /// across all workers of this prober.
    pub fn with_config(config: ProbeConfig) -> Self {
        let dns = DnsPrechecker::with_timeout(config.dns_timeout);
        let limiter = Arc::new(WhoisRateLimiter::with_min_interval(config.whois_delay));
        let whois = WhoisResolver::with_timeout(config.whois_timeout, limiter);
        Self { config, dns, whois }
    }
}

impl Default for DomainProber {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: DnsPrecheck, W: WhoisLookup> DomainProber<D, W> {
    /// Create a prober from explicit probe implementations.
    ///
    /// Intended for tests and custom backends.
    pub fn with_clients(config: ProbeConfig, dns: D, whois: W) -> Self {
        Self { config, dns, whois }
    }

    /// The configuration this prober was built with.
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Classify a single candidate domain.
    ///
    /// Two-stage sequence: the DNS precheck either settles the candidate as
    /// registered or defers to WHOIS, whose answer is authoritative. A
    /// transient DNS failure also defers to WHOIS - it is never read as
    /// "no records". This method does not fail; errors are folded into the
    /// result per the configured policy.
    pub async fn classify(&self, domain: &str) -> CandidateResult {
        let start = Instant::now();

        match self.dns.precheck(domain).await {
            Ok(DnsVerdict::Registered) => {
                return CandidateResult {
                    domain: domain.to_string(),
                    status: DomainStatus::Registered,
                    method: CheckMethod::Dns,
                    check_duration: Some(start.elapsed()),
                    error: None,
                };
            }
            Ok(DnsVerdict::NoRecords) => {
                debug!(domain = %domain, "DNS inconclusive, falling back to WHOIS");
            }
            Err(e) => {
                // Transient resolver failure: inconclusive, not "available"
                warn!(domain = %domain, error = %e, "DNS precheck failed, deferring to WHOIS");
            }
        }

        match self.whois.status(domain).await {
            Ok(WhoisStatus::Registered) => CandidateResult {
                domain: domain.to_string(),
                status: DomainStatus::Registered,
                method: CheckMethod::Whois,
                check_duration: Some(start.elapsed()),
                error: None,
            },
            Ok(WhoisStatus::Unregistered) => CandidateResult {
                domain: domain.to_string(),
                status: DomainStatus::Available,
                method: CheckMethod::Whois,
                check_duration: Some(start.elapsed()),
                error: None,
            },
            Err(e) => {
                warn!(domain = %domain, error = %e, "WHOIS query failed");
                let status = match self.config.on_whois_error {
                    WhoisErrorPolicy::Optimistic => DomainStatus::Available,
                    WhoisErrorPolicy::Conservative => DomainStatus::Unknown,
                };
                CandidateResult {
                    domain: domain.to_string(),
                    status,
                    method: CheckMethod::Whois,
                    check_duration: Some(start.elapsed()),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Expand seeds and classify every resulting candidate.
    ///
    /// Uses the configured TLD list (or the built-in default) for keyword
    /// expansion. Fails only when expansion produces zero candidates.
    pub async fn run(&self, seeds: &[String]) -> Result<RunReport, ProbeError> {
        let tlds = self.config.tlds.clone().unwrap_or_else(default_tlds);
        let expansion = expand_seeds(seeds, &tlds);

        for skipped in &expansion.skipped {
            warn!(seed = %skipped.seed, reason = %skipped.reason, "skipping malformed seed");
        }
        if expansion.candidates.is_empty() {
            return Err(ProbeError::NoCandidates);
        }

        Ok(self
            .run_candidates(&expansion.candidates, None, CancellationToken::new())
            .await)
    }

    /// Classify a candidate set across a bounded worker pool.
    ///
    /// Results come back in candidate (discovery) order regardless of
    /// completion order. `progress` is invoked as candidates finish, with a
    /// shared completion counter. Cancelling `cancel` stops new candidate
    /// work; in-flight probes complete normally and cancelled candidates are
    /// reported as Unknown.
    pub async fn run_candidates(
        &self,
        candidates: &[String],
        progress: Option<ProgressCallback>,
        cancel: CancellationToken,
    ) -> RunReport {
        let total = candidates.len();
        let completed = Arc::new(AtomicUsize::new(0));
        let progress = progress.as_ref();

        debug!(
            total = total,
            concurrency = self.config.concurrency,
            "starting probe run"
        );

        let mut indexed: Vec<(usize, CandidateResult)> =
            stream::iter(candidates.iter().cloned().enumerate())
                .map(|(index, domain)| {
                    let completed = completed.clone();
                    let cancel = cancel.clone();
                    async move {
                        let result = if cancel.is_cancelled() {
                            CandidateResult {
                                domain: domain.clone(),
                                status: DomainStatus::Unknown,
                                method: CheckMethod::Unknown,
                                check_duration: None,
                                error: Some("run cancelled before probe".to_string()),
                            }
                        } else {
                            self.classify(&domain).await
                        };

                        let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                        if let Some(progress) = progress {
                            progress(done, total, &domain);
                        }
                        (index, result)
                    }
                })
                .buffer_unordered(self.config.concurrency.max(1))
                .collect()
                .await;

        indexed.sort_by_key(|(index, _)| *index);
        RunReport::from_results(indexed.into_iter().map(|(_, r)| r).collect())
    }
}
