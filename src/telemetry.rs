use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber: JSON lines on stdout, filtered by
/// `RUST_LOG` when set and by `env_filter` otherwise.
///
/// Submissions run inside the "Submit form" span, so every event carries the
/// current span's `endpoint` and `submission_id`. Only span closes are logged,
/// which records how long each submission took.
pub fn init_subscriber(env_filter: String) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| env_filter.into());
    let formatter = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .json()
        .with_current_span(true)
        .with_span_list(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(formatter)
        .init();
}
