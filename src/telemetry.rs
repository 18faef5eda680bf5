//! Telemetry helpers for hosts embedding `chart-pipeline`.
//!
//! Tracing setup stays explicit and opt-in. Hosts can either call one of the
//! `init_*` helpers below or install their own `tracing` subscriber.

/// Default filter used when neither `RUST_LOG` nor an explicit directive is set.
pub const DEFAULT_FILTER: &str = "info";

/// Initializes a default `tracing` subscriber when the `telemetry` feature is enabled.
///
/// The filter comes from `RUST_LOG` and falls back to [`DEFAULT_FILTER`].
/// Returns `false` when the feature is disabled or a global subscriber already exists.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_filter(None)
}

/// Same as [`init_default_tracing`], but an explicit directive (for example
/// `chart_pipeline=debug`) takes precedence over `RUST_LOG`.
#[must_use]
pub fn init_tracing_with_filter(directive: Option<&str>) -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = match directive {
            Some(directive) => EnvFilter::try_new(directive)
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        };

        // Logs go to stderr so piped chart output on stdout stays clean.
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = directive;
        false
    }
}
