//! Command-line and environment configuration

use clap::Parser;
use ecstatic_common::defaults::{
    DEFAULT_API_TIMEOUT_SECS, DEFAULT_LOG_LEVEL, DEFAULT_NOTIFY_TIMEOUT_SECS,
    ENV_API_TIMEOUT_SECS, ENV_LOG_LEVEL, ENV_NOTIFY_TIMEOUT_SECS, ENV_WEBHOOK_URL,
};
use std::time::Duration;
use thiserror::Error;
use tracing::Level;

/// Invalid configuration values, reported before any scan starts
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid log level '{0}' (expected trace, debug, info, warn or error)")]
    InvalidLogLevel(String),

    #[error("--{option} must be at least 1 second")]
    ZeroTimeout { option: &'static str },

    #[error("invalid webhook URL: {reason}")]
    InvalidWebhookUrl { reason: String },
}

#[derive(Parser, Debug, Clone)]
#[command(name = "ecstatic")]
#[command(about = "Keeps ECS container agents current, one instance per cluster per run")]
#[command(version)]
pub struct Args {
    /// AWS region (default: SDK provider chain)
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// AWS profile to use
    #[arg(long, env = "AWS_PROFILE")]
    pub aws_profile: Option<String>,

    /// Scan only this cluster (ARN or name); repeat for several (default: all clusters)
    #[arg(long = "cluster", value_name = "CLUSTER")]
    pub clusters: Vec<String>,

    /// Log verbosity
    #[arg(long, env = ENV_LOG_LEVEL, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// Slack-compatible incoming webhook; notifications are disabled without it
    #[arg(long, env = ENV_WEBHOOK_URL, hide_env_values = true)]
    pub webhook_url: Option<String>,

    /// Timeout for a single ECS API call, in seconds
    #[arg(long, env = ENV_API_TIMEOUT_SECS, default_value_t = DEFAULT_API_TIMEOUT_SECS)]
    pub api_timeout: u64,

    /// Timeout for a single webhook request, in seconds
    #[arg(long, env = ENV_NOTIFY_TIMEOUT_SECS, default_value_t = DEFAULT_NOTIFY_TIMEOUT_SECS)]
    pub notify_timeout: u64,

    /// Print the scan report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// AWS access configuration
#[derive(Debug, Clone)]
pub struct AwsConfig {
    pub region: Option<String>,
    pub aws_profile: Option<String>,
    /// Bound on every control-plane call
    pub api_timeout: Duration,
}

/// Notification sink configuration
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// `None` disables notifications
    pub webhook_url: Option<String>,
    pub timeout: Duration,
}

/// What to scan and how to report it
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Empty means every cluster in the region
    pub clusters: Vec<String>,
    pub json: bool,
}

/// Validated configuration for one run
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: Level,
    pub aws: AwsConfig,
    pub notify: NotifyConfig,
    pub scan: ScanConfig,
}

impl TryFrom<Args> for Config {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        Ok(Self {
            log_level: parse_log_level(&args.log_level)?,
            aws: AwsConfig {
                region: non_empty(args.region),
                aws_profile: non_empty(args.aws_profile),
                api_timeout: timeout("api-timeout", args.api_timeout)?,
            },
            notify: NotifyConfig {
                webhook_url: webhook_url(args.webhook_url)?,
                timeout: timeout("notify-timeout", args.notify_timeout)?,
            },
            scan: ScanConfig {
                clusters: args
                    .clusters
                    .into_iter()
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect(),
                json: args.json,
            },
        })
    }
}

/// Parse a level name, case-insensitively. `warning` and `critical` are
/// accepted as aliases for `warn` and `error`.
pub fn parse_log_level(raw: &str) -> Result<Level, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" | "critical" => Ok(Level::ERROR),
        _ => Err(ConfigError::InvalidLogLevel(raw.to_string())),
    }
}

fn timeout(option: &'static str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::ZeroTimeout { option });
    }
    Ok(Duration::from_secs(secs))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// An empty URL means notifications are off.
fn webhook_url(raw: Option<String>) -> Result<Option<String>, ConfigError> {
    let Some(url) = non_empty(raw) else {
        return Ok(None);
    };

    let parsed = reqwest::Url::parse(&url).map_err(|e| ConfigError::InvalidWebhookUrl {
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidWebhookUrl {
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(Some(url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ENV_VARS: &[&str] = &[
        "AWS_REGION",
        "AWS_PROFILE",
        ENV_LOG_LEVEL,
        ENV_WEBHOOK_URL,
        ENV_API_TIMEOUT_SECS,
        ENV_NOTIFY_TIMEOUT_SECS,
    ];

    fn clear_env() {
        for var in ENV_VARS {
            // SAFETY: tests touching the environment are #[serial]
            unsafe { std::env::remove_var(var) };
        }
    }

    fn parse(argv: &[&str]) -> Config {
        let args = Args::try_parse_from(std::iter::once("ecstatic").chain(argv.iter().copied()))
            .unwrap();
        Config::try_from(args).unwrap()
    }

    #[test]
    #[serial]
    fn test_defaults_without_environment() {
        clear_env();
        let config = parse(&[]);

        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.aws.region, None);
        assert_eq!(config.aws.api_timeout, Duration::from_secs(30));
        assert_eq!(config.notify.timeout, Duration::from_secs(10));
        assert_eq!(config.notify.webhook_url, None);
        assert!(config.scan.clusters.is_empty());
        assert!(!config.scan.json);
    }

    #[test]
    #[serial]
    fn test_environment_fallbacks() {
        clear_env();
        // SAFETY: serialized with other environment tests
        unsafe {
            std::env::set_var("AWS_REGION", "eu-west-1");
            std::env::set_var(ENV_LOG_LEVEL, "DEBUG");
            std::env::set_var(ENV_WEBHOOK_URL, "https://hooks.slack.com/services/T/B/X");
            std::env::set_var(ENV_API_TIMEOUT_SECS, "5");
        }

        let config = parse(&[]);
        clear_env();

        assert_eq!(config.aws.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(
            config.notify.webhook_url.as_deref(),
            Some("https://hooks.slack.com/services/T/B/X")
        );
        assert_eq!(config.aws.api_timeout, Duration::from_secs(5));
    }

    #[test]
    #[serial]
    fn test_flags_override_environment() {
        clear_env();
        // SAFETY: serialized with other environment tests
        unsafe { std::env::set_var(ENV_LOG_LEVEL, "error") };

        let config = parse(&[
            "--log-level",
            "warning",
            "--cluster",
            "arn:c1",
            "--cluster",
            "arn:c2",
            "--json",
        ]);
        clear_env();

        assert_eq!(config.log_level, Level::WARN);
        assert_eq!(config.scan.clusters, vec!["arn:c1", "arn:c2"]);
        assert!(config.scan.json);
    }

    #[test]
    #[serial]
    fn test_empty_webhook_url_disables_notifications() {
        clear_env();
        let config = parse(&["--webhook-url", "  "]);
        assert_eq!(config.notify.webhook_url, None);
    }

    #[test]
    #[serial]
    fn test_rejects_invalid_values() {
        clear_env();
        let cases = [
            (
                vec!["--api-timeout", "0"],
                ConfigError::ZeroTimeout { option: "api-timeout" },
            ),
            (
                vec!["--notify-timeout", "0"],
                ConfigError::ZeroTimeout { option: "notify-timeout" },
            ),
            (
                vec!["--log-level", "loud"],
                ConfigError::InvalidLogLevel("loud".to_string()),
            ),
        ];

        for (argv, expected) in cases {
            let args =
                Args::try_parse_from(std::iter::once("ecstatic").chain(argv.iter().copied()))
                    .unwrap();
            assert_eq!(Config::try_from(args).unwrap_err(), expected);
        }
    }

    #[test]
    fn test_webhook_url_must_be_http() {
        assert!(matches!(
            webhook_url(Some("not a url".to_string())),
            Err(ConfigError::InvalidWebhookUrl { .. })
        ));
        assert!(matches!(
            webhook_url(Some("ftp://example.com/hook".to_string())),
            Err(ConfigError::InvalidWebhookUrl { .. })
        ));
        assert_eq!(
            webhook_url(Some("http://localhost:8080/hook".to_string())).unwrap(),
            Some("http://localhost:8080/hook".to_string())
        );
    }

    #[test]
    fn test_log_level_aliases() {
        assert_eq!(parse_log_level("CRITICAL").unwrap(), Level::ERROR);
        assert_eq!(parse_log_level(" Info ").unwrap(), Level::INFO);
        assert_eq!(parse_log_level("trace").unwrap(), Level::TRACE);
    }
}
