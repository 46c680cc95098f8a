//! Tracing setup for the CLI
//!
//! Logs go to stderr so `--json` output on stdout stays machine readable.
//! `RUST_LOG` wins over the verbosity flag when set.

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for a verbosity level
///
/// # Examples
///
/// ```
/// use wanderlust::logging::default_directive;
///
/// assert_eq!(default_directive(false), "wanderlust=info");
/// assert_eq!(default_directive(true), "wanderlust=debug");
/// ```
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "wanderlust=debug"
    } else {
        "wanderlust=info"
    }
}

/// Install the global subscriber
///
/// # Errors
///
/// Returns error if the filter is invalid or a subscriber is already set
pub fn init_logging(verbose: bool, json: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(verbose)))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        let layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr);
        registry.with(layer).try_init()?;
    } else {
        let layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_writer(std::io::stderr);
        registry.with(layer).try_init()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_parses() {
        assert!(EnvFilter::try_new(default_directive(false)).is_ok());
        assert!(EnvFilter::try_new(default_directive(true)).is_ok());
    }
}
