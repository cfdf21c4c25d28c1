//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

use crate::config::RendererConfig;

/// Initialize the logging system from `RUST_LOG`
///
/// Returns `false` if a logger was already installed.
pub fn init() -> bool {
    env_logger::Builder::from_default_env().try_init().is_ok()
}

/// Initialize the logging system with an explicit filter such as `"gamert=debug"`
///
/// `RUST_LOG` still takes precedence when it is set.
pub fn init_with_filter(filter: &str) -> bool {
    let env_filter = std::env::var("RUST_LOG").ok();
    builder(filter, env_filter.as_deref()).try_init().is_ok()
}

/// Initialize the logging system with [`RendererConfig::log_filter`]
///
/// ```no_run
/// let config = gamert::config::RendererConfig::default();
/// gamert::foundation::logging::init_from_config(&config);
/// ```
pub fn init_from_config(config: &RendererConfig) -> bool {
    init_with_filter(&config.log_filter)
}

fn builder(filter: &str, env_filter: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(filter);
    if let Some(env_filter) = env_filter {
        builder.parse_filters(env_filter);
    }
    builder
}
