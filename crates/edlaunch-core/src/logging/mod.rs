use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global JSON subscriber, writing to stderr.
///
/// `quiet` limits output to errors unless `RUST_LOG` says otherwise.
/// Calling it twice is harmless.
pub fn init_logging(quiet: bool) {
    let default_level = if quiet { "edlaunch=error,error" } else { "edlaunch=debug,info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .json()
                .with_current_span(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}
