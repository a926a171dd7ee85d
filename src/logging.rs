//! Tracing subscriber setup for the CLI.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Level used for a given `-v` count.
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

/// Filter for a run: `RUST_LOG` directives when set, else the `-v` level.
pub fn filter_for(verbosity: u8, rust_log: Option<&str>) -> EnvFilter {
    match rust_log.map(str::trim).filter(|d| !d.is_empty()) {
        Some(directives) => EnvFilter::builder().parse_lossy(directives),
        None => EnvFilter::builder()
            .with_default_directive(level_for(verbosity).into())
            .parse_lossy(""),
    }
}

/// Initialize the global subscriber, writing to stderr.
///
/// Calling this twice is harmless; the second subscriber is discarded.
pub fn init(verbosity: u8) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbosity, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::{Layer, Registry};

    fn max_level(filter: &EnvFilter) -> Option<LevelFilter> {
        <EnvFilter as Layer<Registry>>::max_level_hint(filter)
    }

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(level_for(0), Level::WARN);
        assert_eq!(level_for(1), Level::INFO);
        assert_eq!(level_for(2), Level::DEBUG);
        assert_eq!(level_for(9), Level::DEBUG);
    }

    #[test]
    fn verbosity_applies_without_rust_log() {
        assert_eq!(max_level(&filter_for(0, None)), Some(LevelFilter::WARN));
        assert_eq!(max_level(&filter_for(2, None)), Some(LevelFilter::DEBUG));
        assert_eq!(max_level(&filter_for(1, Some("  "))), Some(LevelFilter::INFO));
    }

    #[test]
    fn rust_log_is_not_overridden() {
        assert_eq!(max_level(&filter_for(0, Some("debug"))), Some(LevelFilter::DEBUG));
        assert_eq!(max_level(&filter_for(2, Some("error"))), Some(LevelFilter::ERROR));
    }
}
