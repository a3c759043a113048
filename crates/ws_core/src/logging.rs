use std::path::PathBuf;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

#[derive(Debug, Clone)]
pub enum LogTarget {
    Stderr,
    /// Append to `wisdom.log` inside the directory. Used when the terminal
    /// is owned by the interactive viewer.
    File(PathBuf),
}

/// Install the global subscriber once. `RUST_LOG` wins over `level`.
pub fn init_logging(level: &str, target: LogTarget) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{},hyper=warn,reqwest=warn,sqlx=warn", level)));

        match target {
            LogTarget::Stderr => {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
            LogTarget::File(dir) => {
                let appender = tracing_appender::rolling::never(dir, "wisdom.log");
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(appender)
                    .init();
            }
        }
    });
}
