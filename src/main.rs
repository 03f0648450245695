use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Logs go to a rolling file under the data dir: the TUI owns the terminal,
/// so writing to stdout/stderr would corrupt the alternate screen.
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_env("VSQ_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let log_dir = vector_search_query::default_data_dir().join("logs");
    if std::fs::create_dir_all(&log_dir).is_err() {
        return None;
    }
    let appender = tracing_appender::rolling::daily(log_dir, "vsq.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

fn main() -> Result<()> {
    let _guard = init_tracing();
    vector_search_query::run()
}
