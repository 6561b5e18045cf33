//! Core data types for domain availability probing.
//!
//! This module defines all the main data structures used throughout the library,
//! including per-candidate results, run summaries and configuration options.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Final classification of a candidate domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainStatus {
    /// Confirmed to exist via DNS infrastructure records or a WHOIS record
    Registered,

    /// No confirming DNS records and no confirming WHOIS record
    Available,

    /// Classification failed; treated conservatively and counted under errors
    Unknown,
}

/// Which data source produced the classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckMethod {
    /// Settled by the DNS precheck (MX or NS records found)
    #[serde(rename = "dns")]
    Dns,

    /// Settled (or attempted) via the WHOIS fallback
    #[serde(rename = "whois")]
    Whois,

    /// No probe was performed (e.g. run cancelled before this candidate)
    #[serde(rename = "unknown")]
    Unknown,
}

/// Result of probing a single candidate domain.
///
/// Produced exactly once per candidate and never revised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateResult {
    /// The candidate domain that was probed (e.g. "example.com")
    pub domain: String,

    /// Final classification for this candidate
    pub status: DomainStatus,

    /// Which probe settled the classification
    pub method: CheckMethod,

    /// How long the probe took to complete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_duration: Option<Duration>,

    /// Error detail when the classification could not be settled cleanly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Policy for candidates whose WHOIS query failed.
///
/// A failed query is genuinely ambiguous, so the choice is surfaced as
/// configuration rather than silently picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhoisErrorPolicy {
    /// Mark the candidate Unknown and keep it out of the available set
    #[default]
    Conservative,

    /// Assume the candidate is available despite the failed query
    Optimistic,
}

impl std::str::FromStr for WhoisErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "conservative" => Ok(Self::Conservative),
            "optimistic" => Ok(Self::Optimistic),
            other => Err(format!(
                "invalid WHOIS error policy '{}', expected 'conservative' or 'optimistic'",
                other
            )),
        }
    }
}

impl std::fmt::Display for WhoisErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conservative => write!(f, "conservative"),
            Self::Optimistic => write!(f, "optimistic"),
        }
    }
}

/// Configuration options for probing operations.
///
/// This struct allows fine-tuning of the probing behavior, including
/// concurrency, timeouts and the WHOIS failure policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Maximum number of concurrent candidate probes
    /// Default: 8, Range: 1-64
    pub concurrency: usize,

    /// Timeout for each DNS query
    /// Default: 5 seconds
    #[serde(skip)] // Don't serialize Duration directly
    pub dns_timeout: Duration,

    /// Timeout for each WHOIS query (registries can be slow)
    /// Default: 30 seconds
    #[serde(skip)]
    pub whois_timeout: Duration,

    /// Minimum interval between WHOIS queries, shared across all workers
    /// Default: 1 second
    #[serde(skip)]
    pub whois_delay: Duration,

    /// What to do when a WHOIS query fails outright
    /// Default: conservative
    pub on_whois_error: WhoisErrorPolicy,

    /// TLDs used to expand bare keywords.
    /// If None, defaults to ["com", "net", "org", "info", "biz"]
    pub tlds: Option<Vec<String>>,
}

impl Default for ProbeConfig {
    /// Create a sensible default configuration.
    ///
    /// These defaults are chosen to stay well inside registry rate limits
    /// while keeping DNS-heavy runs fast.
    fn default() -> Self {
        Self {
            concurrency: 8,
            dns_timeout: Duration::from_secs(5),
            whois_timeout: Duration::from_secs(30),
            whois_delay: Duration::from_secs(1),
            on_whois_error: WhoisErrorPolicy::Conservative,
            tlds: None,
        }
    }
}

impl ProbeConfig {
    /// Set the number of concurrent probes.
    ///
    /// Automatically clamps to 1-64 to respect resolver and registry capacity.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, 64);
        self
    }

    /// Set a custom timeout for DNS queries.
    pub fn with_dns_timeout(mut self, timeout: Duration) -> Self {
        self.dns_timeout = timeout;
        self
    }

    /// Set a custom timeout for WHOIS queries.
    pub fn with_whois_timeout(mut self, timeout: Duration) -> Self {
        self.whois_timeout = timeout;
        self
    }

    /// Set the shared minimum interval between WHOIS queries.
    pub fn with_whois_delay(mut self, delay: Duration) -> Self {
        self.whois_delay = delay;
        self
    }

    /// Set the policy applied when a WHOIS query fails.
    pub fn with_whois_error_policy(mut self, policy: WhoisErrorPolicy) -> Self {
        self.on_whois_error = policy;
        self
    }

    /// Set TLDs used to expand bare keyword seeds.
    pub fn with_tlds(mut self, tlds: Vec<String>) -> Self {
        self.tlds = Some(tlds);
        self
    }
}

/// Aggregate counters for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Total candidates classified (after dedup)
    pub total: usize,

    /// Candidates classified Registered
    pub registered: usize,

    /// Candidates classified Available
    pub available: usize,

    /// Candidates whose classification hit an error
    pub errors: usize,
}

/// Everything produced by a single probing run.
///
/// Results are in candidate discovery order. A report is scoped to one run;
/// no state survives between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Per-candidate outcomes, one entry per deduplicated candidate
    pub results: Vec<CandidateResult>,

    /// Aggregate counters over `results`
    pub summary: RunSummary,
}

impl RunReport {
    /// Build a report from per-candidate results, computing the counters.
    pub fn from_results(results: Vec<CandidateResult>) -> Self {
        let summary = RunSummary {
            total: results.len(),
            registered: results
                .iter()
                .filter(|r| r.status == DomainStatus::Registered)
                .count(),
            available: results
                .iter()
                .filter(|r| r.status == DomainStatus::Available)
                .count(),
            errors: results.iter().filter(|r| r.error.is_some()).count(),
        };
        Self { results, summary }
    }

    /// The candidates classified Available, in discovery order.
    pub fn available(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.status == DomainStatus::Available)
            .map(|r| r.domain.as_str())
            .collect()
    }
}

impl std::fmt::Display for CheckMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckMethod::Dns => write!(f, "DNS"),
            CheckMethod::Whois => write!(f, "WHOIS"),
            CheckMethod::Unknown => write!(f, "Unknown"),
        }
    }
}

impl std::fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainStatus::Registered => write!(f, "REGISTERED"),
            DomainStatus::Available => write!(f, "AVAILABLE"),
            DomainStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(domain: &str, status: DomainStatus, error: Option<&str>) -> CandidateResult {
        CandidateResult {
            domain: domain.to_string(),
            status,
            method: CheckMethod::Dns,
            check_duration: None,
            error: error.map(String::from),
        }
    }

    #[test]
    fn test_report_counters() {
        let report = RunReport::from_results(vec![
            result("a.com", DomainStatus::Registered, None),
            result("b.com", DomainStatus::Available, None),
            result("c.com", DomainStatus::Unknown, Some("whois failed")),
        ]);

        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.registered, 1);
        assert_eq!(report.summary.available, 1);
        assert_eq!(report.summary.errors, 1);
        assert_eq!(report.available(), vec!["b.com"]);
    }

    #[test]
    fn test_available_preserves_discovery_order() {
        let report = RunReport::from_results(vec![
            result("z.com", DomainStatus::Available, None),
            result("a.com", DomainStatus::Registered, None),
            result("m.com", DomainStatus::Available, None),
        ]);

        assert_eq!(report.available(), vec!["z.com", "m.com"]);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            "conservative".parse::<WhoisErrorPolicy>().unwrap(),
            WhoisErrorPolicy::Conservative
        );
        assert_eq!(
            "OPTIMISTIC".parse::<WhoisErrorPolicy>().unwrap(),
            WhoisErrorPolicy::Optimistic
        );
        assert!("lenient".parse::<WhoisErrorPolicy>().is_err());
        assert_eq!(WhoisErrorPolicy::default(), WhoisErrorPolicy::Conservative);
    }

    #[test]
    fn test_concurrency_clamped() {
        let config = ProbeConfig::default().with_concurrency(500);
        assert_eq!(config.concurrency, 64);

        let config = ProbeConfig::default().with_concurrency(0);
        assert_eq!(config.concurrency, 1);
    }
}
