//! Candidate generation from seed tokens.
//!
//! Seeds arrive as raw lines: email addresses, bare keywords or already
//! qualified domains. This module turns them into a deduplicated set of
//! fully-qualified candidate domains:
//!
//! - `user@domain.tld` -> `domain.tld` (substring after the first `@`)
//! - `keyword` -> `keyword.tld` for every TLD in the list, in list order
//! - `domain.tld` -> passthrough
//!
//! An email whose extracted part has no dot is still a keyword and gets the
//! TLD cross product. Malformed seeds are skipped and reported, never fatal.

use std::collections::HashSet;

/// TLDs used when no external list is supplied.
pub const DEFAULT_TLDS: [&str; 5] = ["com", "net", "org", "info", "biz"];

/// The default TLD list as owned strings.
pub fn default_tlds() -> Vec<String> {
    DEFAULT_TLDS.iter().map(|t| t.to_string()).collect()
}

/// How a seed token is interpreted during expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedKind {
    /// Contains `@`; the domain part is extracted
    Email,
    /// No dot; crossed with the TLD list
    Keyword,
    /// Already a fully-qualified domain; passed through
    Qualified,
}

/// Classify a seed token by shape.
pub fn classify_seed(seed: &str) -> SeedKind {
    if seed.contains('@') {
        SeedKind::Email
    } else if !seed.contains('.') {
        SeedKind::Keyword
    } else {
        SeedKind::Qualified
    }
}

/// A seed that could not be expanded, with the reason it was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSeed {
    pub seed: String,
    pub reason: String,
}

/// Outcome of expanding a seed list.
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    /// Deduplicated candidates in discovery order.
    /// Invariant: every entry contains at least one `.` separator.
    pub candidates: Vec<String>,

    /// Candidate count before deduplication, for observability
    pub raw_count: usize,

    /// Seeds that were skipped as malformed
    pub skipped: Vec<SkippedSeed>,
}

/// Expand seed tokens into a deduplicated candidate set.
///
/// Candidates are lowercased so that duplicates differing only in case
/// collapse to a single classification. For a mixed-case email seed the
/// candidate is therefore the lowercased form of the domain part after `@`,
/// not the byte-for-byte substring; DNS and WHOIS are case-insensitive, so
/// nothing is lost. Blank seeds are ignored silently; malformed ones are
/// recorded in `skipped`.
pub fn expand_seeds(seeds: &[String], tlds: &[String]) -> Expansion {
    let mut expansion = Expansion::default();
    let mut seen: HashSet<String> = HashSet::new();

    for seed in seeds {
        let trimmed = seed.trim();
        if trimmed.is_empty() {
            continue;
        }

        // Email seeds: keep the substring after the first '@'
        let token = match trimmed.split_once('@') {
            Some((_, domain_part)) => {
                let domain_part = domain_part.trim();
                if domain_part.is_empty() {
                    expansion.skipped.push(SkippedSeed {
                        seed: trimmed.to_string(),
                        reason: "no domain part after '@'".to_string(),
                    });
                    continue;
                }
                domain_part
            }
            None => trimmed,
        };

        let token = token.to_lowercase();

        if token.contains('.') {
            expansion.raw_count += 1;
            if seen.insert(token.clone()) {
                expansion.candidates.push(token);
            }
        } else {
            // Bare keyword: cross with the TLD list, preserving list order
            for tld in tlds {
                let tld = tld.trim().trim_start_matches('.');
                if tld.is_empty() {
                    continue;
                }
                expansion.raw_count += 1;
                let candidate = format!("{}.{}", token, tld.to_lowercase());
                if seen.insert(candidate.clone()) {
                    expansion.candidates.push(candidate);
                }
            }
        }
    }

    expansion
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeds(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_email_extracts_domain_after_first_at() {
        let expansion = expand_seeds(&seeds(&["alice@example.com"]), &default_tlds());
        assert_eq!(expansion.candidates, vec!["example.com"]);
        assert_eq!(expansion.raw_count, 1);
        assert!(expansion.skipped.is_empty());

        // Everything after the *first* '@' is the domain part
        let expansion = expand_seeds(&seeds(&["weird@user@host.net"]), &default_tlds());
        assert_eq!(expansion.candidates, vec!["user@host.net"]);
    }

    #[test]
    fn test_keyword_crossed_with_every_tld_in_order() {
        let tlds = seeds(&["com", "net"]);
        let expansion = expand_seeds(&seeds(&["zzqxvportmanteau123"]), &tlds);
        assert_eq!(
            expansion.candidates,
            vec!["zzqxvportmanteau123.com", "zzqxvportmanteau123.net"]
        );
        assert_eq!(expansion.raw_count, 2);
    }

    #[test]
    fn test_qualified_domain_passes_through_unchanged() {
        let expansion = expand_seeds(&seeds(&["already.qualified.org"]), &default_tlds());
        assert_eq!(expansion.candidates, vec!["already.qualified.org"]);
        assert_eq!(expansion.raw_count, 1);
    }

    #[test]
    fn test_email_with_bare_keyword_domain_is_expanded() {
        // "user@intranet" extracts "intranet", which has no TLD
        let tlds = seeds(&["com", "org"]);
        let expansion = expand_seeds(&seeds(&["user@intranet"]), &tlds);
        assert_eq!(expansion.candidates, vec!["intranet.com", "intranet.org"]);
    }

    #[test]
    fn test_malformed_email_skipped_not_fatal() {
        let expansion = expand_seeds(&seeds(&["user@", "good.com"]), &default_tlds());
        assert_eq!(expansion.candidates, vec!["good.com"]);
        assert_eq!(expansion.skipped.len(), 1);
        assert_eq!(expansion.skipped[0].seed, "user@");
    }

    #[test]
    fn test_duplicates_collapse_but_raw_count_keeps_them() {
        let input = seeds(&["alice@example.com", "bob@example.com", "Example.COM"]);
        let expansion = expand_seeds(&input, &default_tlds());
        assert_eq!(expansion.candidates, vec!["example.com"]);
        assert_eq!(expansion.raw_count, 3);
    }

    #[test]
    fn test_expansion_is_idempotent() {
        let input = seeds(&["alpha", "beta.com", "carol@delta.net", "alpha"]);
        let tlds = seeds(&["com", "net"]);

        let first = expand_seeds(&input, &tlds);
        let second = expand_seeds(&input, &tlds);
        assert_eq!(first.candidates, second.candidates);
        assert_eq!(first.raw_count, second.raw_count);
    }

    #[test]
    fn test_blank_lines_and_whitespace_ignored() {
        let input = seeds(&["", "   ", "  spaced.com  "]);
        let expansion = expand_seeds(&input, &default_tlds());
        assert_eq!(expansion.candidates, vec!["spaced.com"]);
        assert!(expansion.skipped.is_empty());
    }

    #[test]
    fn test_tld_list_entries_are_cleaned() {
        // Leading dots and whitespace in TLD files are tolerated
        let tlds = seeds(&[".com", " net ", ""]);
        let expansion = expand_seeds(&seeds(&["word"]), &tlds);
        assert_eq!(expansion.candidates, vec!["word.com", "word.net"]);
    }

    #[test]
    fn test_every_candidate_contains_a_dot() {
        let input = seeds(&["keyword", "plain.com", "eve@mail.org"]);
        let expansion = expand_seeds(&input, &default_tlds());
        assert!(expansion.candidates.iter().all(|c| c.contains('.')));
    }

    #[test]
    fn test_classify_seed() {
        assert_eq!(classify_seed("user@example.com"), SeedKind::Email);
        assert_eq!(classify_seed("keyword"), SeedKind::Keyword);
        assert_eq!(classify_seed("example.com"), SeedKind::Qualified);
    }
}
