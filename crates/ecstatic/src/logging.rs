//! Tracing subscriber setup

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// SDK targets held at `warn` unless `RUST_LOG` says otherwise
const QUIET_TARGETS: &[&str] = &["aws_config", "aws_sdk_ecs", "aws_smithy_runtime", "hyper_util"];

/// Build the filter: `level` for everything, SDK noise capped at `warn`,
/// then any `RUST_LOG` directives on top. Invalid `RUST_LOG` directives are
/// ignored.
pub fn env_filter(level: Level, rust_log: Option<&str>) -> EnvFilter {
    let mut directives = vec![level.as_str().to_ascii_lowercase()];
    directives.extend(QUIET_TARGETS.iter().map(|target| format!("{target}=warn")));
    if let Some(rust_log) = rust_log.filter(|s| !s.trim().is_empty()) {
        directives.push(rust_log.to_string());
    }

    EnvFilter::new(directives.join(","))
}

/// Install the global fmt subscriber.
pub fn init(level: Level) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level, rust_log.as_deref()))
        .init();
}
