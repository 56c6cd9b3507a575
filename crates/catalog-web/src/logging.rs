//! Tracing subscriber setup for the server binary.

use catalog_core::config::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the catalog crates log at `info`, or
/// `debug` together with request traces when `debug` is on.
pub fn init_logger(debug: bool, json: bool) {
    let fallback = if debug {
        format!("{}=debug,tower_http=debug,info", AppConfig::LOG_TARGET)
    } else {
        format!("{}=info,warn", AppConfig::LOG_TARGET)
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let fmt = tracing_subscriber::fmt::layer()
        .with_target(debug)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt.json()).init();
    } else {
        registry.with(fmt.compact()).init();
    }
}
