use tracing_subscriber::EnvFilter;

/// Default filter directive for the given verbosity flags. `quiet` wins over
/// `verbose`.
pub fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Installs the global stderr subscriber. `RUST_LOG` overrides the flags.
///
/// Calling this twice is harmless: the second subscriber is silently dropped.
pub fn init_logging(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
