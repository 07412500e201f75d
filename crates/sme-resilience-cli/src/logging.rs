use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize stderr logging for the CLI.
///
/// `RUST_LOG` takes precedence over `level`. stdout stays reserved for the
/// command output so it can be piped.
pub fn init_logging(level: &str) {
    let default_filter = format!("smers={level},sme_resilience_core={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init();
}
