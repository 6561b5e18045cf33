//! WHOIS fallback for candidates the DNS precheck could not settle.
//!
//! Speaks the raw WHOIS protocol: a TCP connection to port 43, the domain
//! followed by CRLF, and a semi-structured text response. A candidate is
//! registered when the response carries a non-empty `Domain Name:` field (or
//! enough registration fields to be unambiguous), unregistered when the
//! response matches a known not-found pattern, and an error otherwise -
//! callers decide what an error means via `WhoisErrorPolicy`.
//!
//! Server selection: a built-in table covers common TLDs; anything else is
//! discovered through an IANA referral query and cached for the run. The
//! shared rate limiter is acquired before every query, discovery included.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::ProbeError;
use crate::ratelimit::WhoisRateLimiter;

const WHOIS_PORT: u16 = 43;
const IANA_WHOIS_SERVER: &str = "whois.iana.org";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RESPONSE_SIZE: usize = 1024 * 1024; // 1MB

/// What the registry said about a domain.
///
/// Query failures are a distinct third outcome (`Err(ProbeError::Whois)`),
/// never folded into `Unregistered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhoisStatus {
    /// The registry confirms a registration record
    Registered,

    /// The registry reports no matching record
    Unregistered,
}

/// Lookup seam for the WHOIS fallback, so the orchestrator can be exercised
/// with scripted doubles in tests.
#[allow(async_fn_in_trait)]
pub trait WhoisLookup {
    /// Query the authoritative registry for a candidate domain.
    async fn status(&self, domain: &str) -> Result<WhoisStatus, ProbeError>;
}

/// Raw TCP WHOIS client with per-TLD server selection.
pub struct WhoisResolver {
    timeout: Duration,
    limiter: Arc<WhoisRateLimiter>,
    /// TLD -> discovered server (None = IANA has no referral). Scoped to this
    /// resolver instance; nothing survives the run.
    discovered: Mutex<HashMap<String, Option<String>>>,
}

impl WhoisResolver {
    /// Create a resolver with the default timeout and the given shared limiter.
    pub fn new(limiter: Arc<WhoisRateLimiter>) -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT, limiter)
    }

    /// Create a resolver with a custom query timeout.
    pub fn with_timeout(timeout: Duration, limiter: Arc<WhoisRateLimiter>) -> Self {
        Self {
            timeout,
            limiter,
            discovered: Mutex::new(HashMap::new()),
        }
    }

    /// The WHOIS server for a TLD: built-in table first, IANA referral
    /// discovery (cached) otherwise.
    async fn server_for(&self, tld: &str) -> Result<String, ProbeError> {
        if let Some(server) = known_whois_server(tld) {
            return Ok(server.to_string());
        }

        if let Some(cached) = self.discovered.lock().expect("cache lock").get(tld) {
            return cached
                .clone()
                .ok_or_else(|| ProbeError::no_whois_server(tld));
        }

        debug!(tld = %tld, "discovering WHOIS server via IANA");
        let response = self.query_server(IANA_WHOIS_SERVER, tld).await?;
        let server = parse_iana_referral(&response);

        self.discovered
            .lock()
            .expect("cache lock")
            .insert(tld.to_string(), server.clone());

        server.ok_or_else(|| ProbeError::no_whois_server(tld))
    }

    /// One rate-limited TCP exchange with a WHOIS server.
    async fn query_server(&self, server: &str, query: &str) -> Result<String, ProbeError> {
        self.limiter.acquire().await;

        let addr = format!("{}:{}", server, WHOIS_PORT);

        let mut stream = timeout(self.timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| ProbeError::timeout(format!("connect to {}", server), self.timeout))?
            .map_err(|e| {
                ProbeError::whois(query, format!("failed to connect to {}: {}", server, e))
            })?;

        let request = format!("{}\r\n", query);
        timeout(self.timeout, stream.write_all(request.as_bytes()))
            .await
            .map_err(|_| ProbeError::timeout(format!("write to {}", server), self.timeout))?
            .map_err(|e| ProbeError::whois(query, format!("failed to send query: {}", e)))?;

        let mut response = Vec::new();
        let mut buf = [0u8; 4096];

        loop {
            let n = timeout(self.timeout, stream.read(&mut buf))
                .await
                .map_err(|_| ProbeError::timeout(format!("read from {}", server), self.timeout))?
                .map_err(|e| ProbeError::whois(query, format!("failed to read response: {}", e)))?;

            if n == 0 {
                break;
            }
            response.extend_from_slice(&buf[..n]);
            if response.len() > MAX_RESPONSE_SIZE {
                return Err(ProbeError::whois(query, "response exceeded size limit"));
            }
        }

        Ok(String::from_utf8_lossy(&response).into_owned())
    }
}

impl WhoisLookup for WhoisResolver {
    async fn status(&self, domain: &str) -> Result<WhoisStatus, ProbeError> {
        let tld = domain
            .rsplit('.')
            .next()
            .filter(|t| !t.is_empty() && *t != domain)
            .ok_or_else(|| ProbeError::invalid_domain(domain, "missing TLD"))?
            .to_lowercase();

        let server = self.server_for(&tld).await?;
        debug!(domain = %domain, server = %server, "querying WHOIS");

        let response = self.query_server(&server, domain).await?;
        classify_response(domain, &response)
    }
}

/// Authoritative WHOIS servers for common TLDs.
fn known_whois_server(tld: &str) -> Option<&'static str> {
    let server = match tld {
        "com" | "net" => "whois.verisign-grs.com",
        "org" => "whois.pir.org",
        "info" => "whois.afilias.net",
        "biz" => "whois.biz",
        "io" => "whois.nic.io",
        "co" => "whois.nic.co",
        "me" => "whois.nic.me",
        "ai" => "whois.nic.ai",
        "tv" => "whois.nic.tv",
        "cc" => "ccwhois.verisign-grs.com",
        "dev" | "app" | "page" => "whois.nic.google",
        "xyz" => "whois.nic.xyz",
        _ => return None,
    };
    Some(server)
}

/// Parse an IANA WHOIS response for the authoritative server of a TLD.
///
/// IANA uses either `refer:` or `whois:`; `refer:` wins when both appear.
fn parse_iana_referral(response: &str) -> Option<String> {
    let mut whois_field = None;

    for line in response.lines() {
        let line = line.trim();
        if let Some(server) = line.strip_prefix("refer:") {
            let server = server.trim();
            if !server.is_empty() {
                return Some(server.to_string());
            }
        } else if let Some(server) = line.strip_prefix("whois:") {
            let server = server.trim();
            if !server.is_empty() {
                whois_field = Some(server.to_string());
            }
        }
    }

    whois_field
}

/// Extract the value of a `key: value` line, matching case-insensitively
/// against an already-lowercased response.
fn field_value<'a>(response_lower: &'a str, key: &str) -> Option<&'a str> {
    for line in response_lower.lines() {
        let line = line.trim();
        if let Some(value) = line.strip_prefix(key) {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value);
            }
        }
    }
    None
}

/// Decide registration status from a WHOIS response body.
///
/// Registry responses vary wildly, so this checks not-found patterns first,
/// then the registered-domain-name field, then a quorum of registration
/// fields. Truly ambiguous responses become errors rather than guesses.
fn classify_response(domain: &str, response: &str) -> Result<WhoisStatus, ProbeError> {
    let lower = response.to_lowercase();

    // Not-found patterns are the most specific signal
    let available_patterns = [
        "no match",
        "not found",
        "no data found",
        "no entries found",
        "domain not found",
        "domain available",
        "status: available",
        "status: free",
        "not registered",
        "no matching record",
        "no object found",
        "the queried object does not exist",
        "object does not exist",
        "this domain name has not been registered",
    ];
    if available_patterns.iter().any(|p| lower.contains(p)) {
        return Ok(WhoisStatus::Unregistered);
    }

    // The canonical registered marker: a non-empty "Domain Name:" field
    if field_value(&lower, "domain name:").is_some() {
        return Ok(WhoisStatus::Registered);
    }

    // Some registries omit the field; accept a quorum of other markers
    let taken_patterns = [
        "registrar:",
        "creation date:",
        "created:",
        "registry domain id:",
        "registrant:",
        "name server:",
        "nserver:",
        "expiry date:",
        "expires:",
    ];
    let taken_count = taken_patterns.iter().filter(|p| lower.contains(*p)).count();
    if taken_count >= 2 {
        return Ok(WhoisStatus::Registered);
    }

    warn!(domain = %domain, "ambiguous WHOIS response");
    Err(ProbeError::whois(
        domain,
        "unable to determine registration status from WHOIS response",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_patterns_mean_unregistered() {
        let response = "No match for domain \"ZZQXV-UNTAKEN.COM\".\n>>> Last update...";
        assert_eq!(
            classify_response("zzqxv-untaken.com", response).unwrap(),
            WhoisStatus::Unregistered
        );

        let response = "Domain not found.";
        assert_eq!(
            classify_response("x.io", response).unwrap(),
            WhoisStatus::Unregistered
        );
    }

    #[test]
    fn test_domain_name_field_means_registered() {
        let response = "Domain Name: EXAMPLE.COM\nRegistry Domain ID: 2336799_DOMAIN_COM-VRSN\n";
        assert_eq!(
            classify_response("example.com", response).unwrap(),
            WhoisStatus::Registered
        );
    }

    #[test]
    fn test_empty_domain_name_field_is_not_registered_marker() {
        // Field present but empty, and only one other marker: ambiguous
        let response = "Domain Name:\nRegistrar:  \nsome boilerplate text that pads the response";
        assert!(classify_response("example.com", response).is_err());
    }

    #[test]
    fn test_field_quorum_means_registered() {
        let response = "registrar: Example Registrar\ncreated: 2001-05-01\nnserver: ns1.example.de\n";
        assert_eq!(
            classify_response("example.de", response).unwrap(),
            WhoisStatus::Registered
        );
    }

    #[test]
    fn test_ambiguous_response_is_an_error_not_a_guess() {
        let response = "% This registry is undergoing maintenance, please retry your query later on.";
        assert!(classify_response("example.com", response).is_err());
    }

    #[test]
    fn test_parse_iana_referral() {
        let response = "% IANA WHOIS server\n\nrefer:        whois.verisign-grs.com\n\ndomain:       COM\n";
        assert_eq!(
            parse_iana_referral(response),
            Some("whois.verisign-grs.com".to_string())
        );

        // whois: field alone
        let response = "whois:        whois.nic.museum\ndomain:       MUSEUM\n";
        assert_eq!(
            parse_iana_referral(response),
            Some("whois.nic.museum".to_string())
        );

        // refer: wins over whois:
        let response = "whois:  whois.old.example\nrefer:  whois.new.example\n";
        assert_eq!(
            parse_iana_referral(response),
            Some("whois.new.example".to_string())
        );

        // neither field, or empty values
        assert_eq!(parse_iana_referral("domain: TEST\nstatus: ACTIVE\n"), None);
        assert_eq!(parse_iana_referral("refer:   \nwhois:  \n"), None);
    }

    #[test]
    fn test_known_server_table() {
        assert_eq!(known_whois_server("com"), Some("whois.verisign-grs.com"));
        assert_eq!(known_whois_server("net"), Some("whois.verisign-grs.com"));
        assert_eq!(known_whois_server("org"), Some("whois.pir.org"));
        assert_eq!(known_whois_server("bar"), None);
    }

    // Network-dependent; run explicitly with --ignored.
    #[tokio::test]
    #[ignore]
    async fn test_live_lookup_of_registered_domain() {
        let resolver = WhoisResolver::new(Arc::new(WhoisRateLimiter::with_min_interval(
            Duration::from_secs(1),
        )));
        let status = resolver.status("example.com").await.unwrap();
        assert_eq!(status, WhoisStatus::Registered);
    }
}
