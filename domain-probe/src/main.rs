//! Domain Probe CLI Application
//!
//! A command-line interface for finding available domains: seeds (domains,
//! email addresses or bare keywords) are expanded into candidates, each
//! candidate gets a fast DNS precheck, and only the inconclusive ones fall
//! through to a rate-limited WHOIS query.

mod ui;

use chrono::Local;
use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use domain_probe_lib::{
    apply_env_config, apply_file_config, default_tlds, expand_seeds, load_env_config,
    parse_duration_string, ConfigManager, DomainProber, ProbeConfig, ProbeError, RunReport,
    WhoisErrorPolicy,
};
use std::path::{Path, PathBuf};
use std::process;
use tokio_util::sync::CancellationToken;
use tracing::debug;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domain-probe
#[derive(Parser, Debug)]
#[command(name = "domain-probe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find available domains using a DNS precheck with WHOIS fallback")]
#[command(
    long_about = "Expand seed tokens (domains, emails, bare keywords) into candidate domains and classify each as registered or available.\n\nRegistered domains are usually settled by a cheap DNS probe (MX/NS records); only inconclusive candidates hit the rate-limited WHOIS fallback."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Seed tokens: domains, email addresses or bare keywords
    #[arg(value_name = "SEEDS", help_heading = "Input")]
    pub seeds: Vec<String>,

    /// Input file with seeds (one per line, '#' comments allowed)
    #[arg(short = 'f', long = "file", value_name = "FILE", help_heading = "Input")]
    pub file: Option<String>,

    /// TLDs for keyword expansion (comma-separated or multiple -t flags)
    #[arg(short = 't', long = "tld", value_name = "TLD", value_delimiter = ',', action = clap::ArgAction::Append, help_heading = "Input")]
    pub tlds: Option<Vec<String>>,

    /// File with TLDs for keyword expansion (one per line)
    #[arg(long = "tld-file", value_name = "FILE", help_heading = "Input")]
    pub tld_file: Option<String>,

    /// Preview the expanded candidate set without probing
    #[arg(long = "dry-run", help_heading = "Input")]
    pub dry_run: bool,

    /// Max concurrent probes (default: 8, max: 64)
    #[arg(
        short = 'c',
        long = "concurrency",
        value_name = "N",
        help_heading = "Performance"
    )]
    pub concurrency: Option<usize>,

    /// DNS query timeout (e.g. 5s, 500ms)
    #[arg(long = "dns-timeout", value_name = "DURATION", help_heading = "Performance")]
    pub dns_timeout: Option<String>,

    /// WHOIS query timeout (registries can be slow)
    #[arg(
        long = "whois-timeout",
        value_name = "DURATION",
        help_heading = "Performance"
    )]
    pub whois_timeout: Option<String>,

    /// Minimum interval between WHOIS queries, shared across workers
    #[arg(
        long = "whois-delay",
        value_name = "DURATION",
        help_heading = "Performance"
    )]
    pub whois_delay: Option<String>,

    /// Policy when a WHOIS query fails: conservative or optimistic
    #[arg(
        long = "on-whois-error",
        value_name = "POLICY",
        help_heading = "Protocol"
    )]
    pub on_whois_error: Option<String>,

    /// Output directory for the available-domains file
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        default_value = ".",
        help_heading = "Output"
    )]
    pub output: String,

    /// Do not write the timestamped output file
    #[arg(long = "no-file", help_heading = "Output")]
    pub no_file: bool,

    /// Output the full report as JSON on stdout
    #[arg(short = 'j', long = "json", help_heading = "Output")]
    pub json: bool,

    /// Suppress progress and summary output
    #[arg(short = 'q', long = "quiet", help_heading = "Output")]
    pub quiet: bool,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,

    /// Show detailed debug information
    #[arg(short = 'd', long = "debug", help_heading = "Configuration")]
    pub debug: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(&args);

    if let Err(e) = run(args).await {
        ui::display_error(&e);
        process::exit(1);
    }
}

fn init_tracing(args: &Args) {
    let default_level = if args.debug {
        "domain_probe=debug,domain_probe_lib=debug"
    } else if args.verbose {
        "domain_probe=info,domain_probe_lib=info"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> Result<(), ProbeError> {
    let config = build_config(&args)?;
    let seeds = gather_seeds(&args)?;
    let tlds = resolve_tlds(&args, &config)?;

    let expansion = expand_seeds(&seeds, &tlds);
    ui::display_skipped(&expansion.skipped);
    if expansion.candidates.is_empty() {
        return Err(ProbeError::NoCandidates);
    }

    if args.dry_run {
        for candidate in &expansion.candidates {
            println!("{}", candidate);
        }
        if !args.quiet {
            eprintln!(
                "{} candidates ({} before dedup), dry run - nothing probed",
                expansion.candidates.len(),
                expansion.raw_count
            );
        }
        return Ok(());
    }

    if !args.quiet && !args.json {
        ui::display_run_header(expansion.candidates.len(), expansion.raw_count);
    }

    // Ctrl-C stops issuing new candidate work; in-flight probes finish and
    // the partial report is still printed and written.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nInterrupt received, finishing in-flight probes...");
                cancel.cancel();
            }
        });
    }

    let progress = if args.quiet || args.json {
        None
    } else {
        Some(ui::progress_printer())
    };

    debug!(candidates = expansion.candidates.len(), "starting run");
    let started = std::time::Instant::now();
    let prober = DomainProber::with_config(config);
    let report = prober
        .run_candidates(&expansion.candidates, progress, cancel)
        .await;
    let elapsed = started.elapsed();

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| ProbeError::internal(format!("JSON encoding failed: {}", e)))?;
        println!("{}", json);
    } else {
        ui::display_report(&report, elapsed);
    }

    if !args.no_file {
        let path = write_output_file(&report, &args.output)?;
        if !args.quiet {
            ui::display_output_path(&path);
        }
    }

    Ok(())
}

/// Build the effective configuration: defaults < config file < env < CLI.
fn build_config(args: &Args) -> Result<ProbeConfig, ProbeError> {
    let manager = ConfigManager::new(args.verbose);
    let file_config = match &args.config {
        Some(path) => manager.load_file(path)?,
        None => manager.discover_and_load()?,
    };

    let mut config = apply_file_config(ProbeConfig::default(), &file_config);
    config = apply_env_config(config, &load_env_config(args.verbose));

    if let Some(concurrency) = args.concurrency {
        config = config.with_concurrency(concurrency);
    }
    if let Some(raw) = &args.dns_timeout {
        config.dns_timeout = parse_cli_duration("--dns-timeout", raw)?;
    }
    if let Some(raw) = &args.whois_timeout {
        config.whois_timeout = parse_cli_duration("--whois-timeout", raw)?;
    }
    if let Some(raw) = &args.whois_delay {
        config.whois_delay = parse_cli_duration("--whois-delay", raw)?;
    }
    if let Some(raw) = &args.on_whois_error {
        config.on_whois_error = raw.parse::<WhoisErrorPolicy>().map_err(ProbeError::config)?;
    }

    Ok(config)
}

/// Unlike the file/env layers, an invalid CLI value is a hard error.
fn parse_cli_duration(flag: &str, raw: &str) -> Result<std::time::Duration, ProbeError> {
    parse_duration_string(raw).ok_or_else(|| {
        ProbeError::config(format!(
            "invalid duration '{}' for {}, use e.g. '5s', '500ms', '2m'",
            raw, flag
        ))
    })
}

/// Collect seeds from positional arguments and the optional seed file.
fn gather_seeds(args: &Args) -> Result<Vec<String>, ProbeError> {
    let mut seeds = args.seeds.clone();
    if let Some(path) = &args.file {
        seeds.extend(read_token_file(path)?);
    }
    if seeds.is_empty() {
        return Err(ProbeError::config(
            "no seeds given; pass them as arguments or via --file",
        ));
    }
    Ok(seeds)
}

/// TLD precedence: -t flags > --tld-file > config file/env > built-in default.
fn resolve_tlds(args: &Args, config: &ProbeConfig) -> Result<Vec<String>, ProbeError> {
    if let Some(tlds) = &args.tlds {
        return Ok(tlds.clone());
    }
    if let Some(path) = &args.tld_file {
        let tlds = read_token_file(path)?;
        if tlds.is_empty() {
            return Err(ProbeError::config(format!(
                "TLD file '{}' contains no entries",
                path
            )));
        }
        return Ok(tlds);
    }
    Ok(config.tlds.clone().unwrap_or_else(default_tlds))
}

/// Read a line-oriented token file, skipping blanks and '#' comments.
fn read_token_file(path: &str) -> Result<Vec<String>, ProbeError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ProbeError::file_error(path, e.to_string()))?;

    Ok(content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}

/// Write the available domains to `available_YYYYMMDDHHMMSS.txt` in `dir`.
fn write_output_file(report: &RunReport, dir: &str) -> Result<PathBuf, ProbeError> {
    let dir = Path::new(dir);
    std::fs::create_dir_all(dir)
        .map_err(|e| ProbeError::file_error(dir.display().to_string(), e.to_string()))?;

    let timestamp = Local::now().format("%Y%m%d%H%M%S");
    let path = dir.join(format!("available_{}.txt", timestamp));

    let mut content = report.available().join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    std::fs::write(&path, content)
        .map_err(|e| ProbeError::file_error(path.display().to_string(), e.to_string()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_token_file_skips_comments_and_blanks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# seed list\n\nexample.com\n  keyword  \n# done").unwrap();

        let tokens = read_token_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(tokens, vec!["example.com", "keyword"]);
    }

    #[test]
    fn test_missing_token_file_is_an_error() {
        assert!(read_token_file("/nonexistent/seeds.txt").is_err());
    }

    #[test]
    fn test_cli_duration_rejects_garbage() {
        assert!(parse_cli_duration("--whois-delay", "soon").is_err());
        assert_eq!(
            parse_cli_duration("--whois-delay", "2s").unwrap(),
            std::time::Duration::from_secs(2)
        );
    }
}
