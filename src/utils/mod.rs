pub mod build_info;
pub mod error_message;
pub mod paths;
pub mod persistence;

pub use error_message::{describe_body, describe_error};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber. `RUST_LOG` directives are
/// honoured, with `coop_core=info` added on top.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy()
            .add_directive(
                "coop_core=info"
                    .parse()
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            );

        // A subscriber installed by the host wins; ignore the error.
        let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
    });
}
