//! Error handling for domain probing operations.
//!
//! This module defines a comprehensive error type that covers all the different
//! ways domain probing can fail, from invalid candidates to network issues.
//! Malformed seeds are not errors; expansion reports them as skipped.
//!
//! The split between `DnsTransient` and a plain "no records" answer matters for
//! correctness: a transient resolver failure must never be mistaken for an
//! authoritative empty answer, or unregistered-looking domains would leak into
//! the available set.

use std::fmt;

/// Main error type for domain probing operations.
///
/// This enum covers all possible failure modes in the probing process,
/// providing detailed context for debugging and user-friendly error messages.
#[derive(Debug, Clone)]
pub enum ProbeError {
    /// Invalid candidate domain format
    InvalidDomain { domain: String, reason: String },

    /// Transient DNS failure (timeout, SERVFAIL, network failure).
    /// Inconclusive by definition - never a firm "no records" answer.
    DnsTransient { domain: String, message: String },

    /// WHOIS protocol specific errors (connection, protocol, parsing)
    Whois { domain: String, message: String },

    /// No WHOIS server is known or discoverable for a TLD
    NoWhoisServer { tld: String },

    /// File I/O errors when reading seed or TLD lists
    File { path: String, message: String },

    /// Configuration errors (invalid settings, etc.)
    Config { message: String },

    /// Timeout errors when operations take too long
    Timeout {
        operation: String,
        duration: std::time::Duration,
    },

    /// Seed expansion produced zero candidates - the run cannot proceed
    NoCandidates,

    /// Generic internal errors that don't fit other categories
    Internal { message: String },
}

impl ProbeError {
    /// Create a new invalid domain error.
    pub fn invalid_domain<D: Into<String>, R: Into<String>>(domain: D, reason: R) -> Self {
        Self::InvalidDomain {
            domain: domain.into(),
            reason: reason.into(),
        }
    }

    /// Create a new transient DNS error.
    pub fn dns_transient<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::DnsTransient {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a new WHOIS error.
    pub fn whois<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::Whois {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a new missing WHOIS server error.
    pub fn no_whois_server<T: Into<String>>(tld: T) -> Self {
        Self::NoWhoisServer { tld: tld.into() }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::File {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: std::time::Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDomain { domain, reason } => {
                write!(f, "Invalid domain '{}': {}", domain, reason)
            }
            Self::DnsTransient { domain, message } => {
                write!(f, "Transient DNS error for '{}': {}", domain, message)
            }
            Self::Whois { domain, message } => {
                write!(f, "WHOIS error for '{}': {}", domain, message)
            }
            Self::NoWhoisServer { tld } => {
                write!(f, "No WHOIS server known for TLD '{}'", tld)
            }
            Self::File { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::Config { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
            Self::NoCandidates => {
                write!(f, "Seed expansion produced zero valid candidates")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for ProbeError {}
