#[cfg(feature = "trace")]
use std::path::Path;

/// Keeps the file writer flushing until dropped at process exit.
#[cfg(feature = "trace")]
pub struct TraceGuard(Option<tracing_appender::non_blocking::WorkerGuard>);

#[cfg(not(feature = "trace"))]
pub struct TraceGuard;

/// Install the global subscriber.
///
/// With `log_dir`, events go to `bmpm-trace.jsonl` there as JSON lines;
/// otherwise to stderr. `RUST_LOG` overrides the default filter.
#[cfg(feature = "trace")]
pub fn init_tracing(log_dir: Option<&Path>) -> TraceGuard {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("bmpm_core=debug,bmpm_cli=debug"))
    };

    match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::never(dir, "bmpm-trace.jsonl");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .json()
                .with_writer(non_blocking)
                .with_target(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_env_filter(filter())
                .init();
            TraceGuard(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_env_filter(filter())
                .init();
            TraceGuard(None)
        }
    }
}

#[cfg(not(feature = "trace"))]
pub fn init_tracing(_log_dir: Option<&std::path::Path>) -> TraceGuard {
    TraceGuard
}
