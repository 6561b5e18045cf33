//! DNS precheck for candidate domains.
//!
//! A cheap existence probe run before any WHOIS traffic: a domain with MX or
//! NS records is registered, full stop. MX is queried first; NS only when the
//! MX answer was an authoritative "no records". Transient resolver failures
//! (timeout, SERVFAIL, network) are surfaced as errors and must be routed to
//! the WHOIS fallback - treating them as "no records" would leak registered
//! domains into the available set.

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::TokioAsyncResolver;
use std::time::Duration;
use tracing::debug;

use crate::error::ProbeError;

/// Default timeout for DNS queries. DNS is fast; longer waits usually mean
/// an unreachable resolver, which the orchestrator handles via WHOIS anyway.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// What the precheck could establish about a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DnsVerdict {
    /// MX or NS records exist; the domain is registered
    Registered,

    /// Authoritative empty/NXDOMAIN answers for both MX and NS.
    /// Inconclusive by itself; the WHOIS fallback decides.
    NoRecords,
}

/// Probe seam for the DNS precheck, so the orchestrator can be exercised
/// with scripted doubles in tests.
#[allow(async_fn_in_trait)]
pub trait DnsPrecheck {
    /// Probe a candidate domain for MX/NS infrastructure records.
    async fn precheck(&self, domain: &str) -> Result<DnsVerdict, ProbeError>;
}

/// MX/NS existence prober backed by an async stub resolver.
///
/// Uses Google public DNS. No retries beyond the resolver's own attempts;
/// retry policy belongs to the orchestrator.
#[derive(Clone)]
pub struct DnsPrechecker {
    resolver: TokioAsyncResolver,
}

impl DnsPrechecker {
    /// Create a prechecker with the default query timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a prechecker with a custom query timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let mut opts = ResolverOpts::default();
        opts.timeout = timeout;
        opts.attempts = 2;
        opts.use_hosts_file = false;

        Self {
            resolver: TokioAsyncResolver::tokio(ResolverConfig::google(), opts),
        }
    }
}

impl Default for DnsPrechecker {
    fn default() -> Self {
        Self::new()
    }
}

impl DnsPrecheck for DnsPrechecker {
    async fn precheck(&self, domain: &str) -> Result<DnsVerdict, ProbeError> {
        // MX first: a positive answer short-circuits without an NS query
        match self.resolver.mx_lookup(domain).await {
            Ok(lookup) if lookup.iter().next().is_some() => {
                debug!(domain = %domain, "MX records found");
                return Ok(DnsVerdict::Registered);
            }
            Ok(_) => {}
            Err(e) if is_no_records(&e) => {}
            Err(e) => return Err(ProbeError::dns_transient(domain, e.to_string())),
        }

        match self.resolver.ns_lookup(domain).await {
            Ok(lookup) if lookup.iter().next().is_some() => {
                debug!(domain = %domain, "NS records found");
                Ok(DnsVerdict::Registered)
            }
            Ok(_) => Ok(DnsVerdict::NoRecords),
            Err(e) if is_no_records(&e) => {
                debug!(domain = %domain, "no MX or NS records");
                Ok(DnsVerdict::NoRecords)
            }
            Err(e) => Err(ProbeError::dns_transient(domain, e.to_string())),
        }
    }
}

/// An authoritative negative answer (empty record set or NXDOMAIN), as
/// opposed to a transient failure.
fn is_no_records(err: &ResolveError) -> bool {
    matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. })
}
