//! Tracing subscriber setup for the `jobs` binary.
//!
//! Diagnostics go to stderr so stdout stays clean for results. The filter
//! comes from `RUST_LOG` when set; otherwise [`default_directive`] applies.

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Filter used when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "job_searcher=debug,job_searcher_core=debug"
    } else {
        "job_searcher=info,job_searcher_core=info"
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    Registry::default()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_parses() {
        for verbose in [false, true] {
            let directive = default_directive(verbose);
            assert!(EnvFilter::try_new(directive).is_ok(), "{}", directive);
        }
        assert!(default_directive(true).contains("debug"));
    }
}
